use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    config::Config,
    error::WeatherError,
    model::WeatherRecord,
};

/// City used by [`WeatherClient::validate_credential`] to probe the key.
const REFERENCE_CITY: &str = "London";

/// Client for the provider's "current weather" endpoint.
///
/// Holds the credential and configuration for its whole lifetime and no
/// mutable state besides, so one instance can be reused across calls.
/// Every [`fetch`](Self::fetch) is exactly one network round trip: no
/// retries, no backoff, no caching.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    api_key: String,
    base_url: String,
    units: String,
    default_language: String,
}

impl WeatherClient {
    pub fn new(config: &Config, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("failed to build HTTP client")?;

        debug!(
            "weather client ready (base_url={}, units={}, timeout={}s)",
            config.api.base_url, config.api.units, config.api.timeout
        );

        Ok(Self {
            http,
            api_key,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            units: config.api.units.clone(),
            default_language: config.defaults.language.clone(),
        })
    }

    /// Fetch the current weather for `city`.
    ///
    /// An empty city name is forwarded as-is; the provider reports it as
    /// not-found. `lang` falls back to the configured default language.
    pub async fn fetch(
        &self,
        city: &str,
        lang: Option<&str>,
    ) -> Result<WeatherRecord, WeatherError> {
        let lang = lang.unwrap_or(&self.default_language);
        let url = format!("{}/weather", self.base_url);

        info!("requesting current weather for '{city}'");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", lang),
            ])
            .send()
            .await?;

        let status = res.status();
        debug!("provider responded with status {status}");

        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::CityNotFound { city: city.to_string() });
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(WeatherError::InvalidCredential(
                "the weather service rejected the API key".to_string(),
            ));
        }
        if status != StatusCode::OK {
            return Err(WeatherError::Provider { status: status.as_u16(), message: None });
        }

        let body = res.text().await?;
        let record = parse_current(&body)?;

        info!("current weather for '{}' fetched", record.city_name);
        Ok(record)
    }

    /// Probe the credential with a fetch for a fixed reference city.
    ///
    /// Returns `false` only when that fetch fails with
    /// [`WeatherError::InvalidCredential`]. Every other failure (not-found,
    /// connection trouble, provider error) reports the credential as fine,
    /// on the grounds that nothing but a 401 indicts the key itself.
    pub async fn validate_credential(&self) -> bool {
        match self.fetch(REFERENCE_CITY, None).await {
            Err(WeatherError::InvalidCredential(_)) => false,
            _ => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    sys: Sys,
    main: Main,
    weather: Vec<Summary>,
    wind: Option<Wind>,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct Summary {
    description: String,
    main: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: Option<f64>,
    deg: Option<u16>,
}

/// Convert a 200 body into a [`WeatherRecord`].
///
/// A missing required field is a malformed-200 response: it maps to
/// [`WeatherError::Provider`] with status 200 and a message naming the
/// field. Missing optional fields are simply absent in the record.
fn parse_current(body: &str) -> Result<WeatherRecord, WeatherError> {
    let parsed: CurrentResponse = serde_json::from_str(body).map_err(|e| WeatherError::Provider {
        status: 200,
        message: Some(format!("incomplete weather payload: {e}")),
    })?;

    let summary = parsed.weather.into_iter().next().ok_or_else(|| WeatherError::Provider {
        status: 200,
        message: Some("incomplete weather payload: missing field `weather`".to_string()),
    })?;

    Ok(WeatherRecord {
        city_name: parsed.name,
        country: parsed.sys.country,
        temperature: round_one_decimal(parsed.main.temp),
        feels_like: round_one_decimal(parsed.main.feels_like),
        humidity: parsed.main.humidity,
        pressure: parsed.main.pressure,
        description: summary.description,
        description_en: summary.main,
        wind_speed: parsed.wind.as_ref().and_then(|w| w.speed),
        wind_direction: parsed.wind.as_ref().and_then(|w| w.deg),
        visibility: parsed.visibility,
        timestamp: Utc::now(),
    })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
