//! Warp filter tree and request handlers.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use chrono::Utc;
use log::error;
use warp::http::StatusCode;
use warp::reply::{self, Reply};
use warp::{Filter, Rejection};
use weather_core::WeatherClient;

use crate::pages;
use crate::response::{
    ErrorEnvelope, HealthComponents, HealthResponse, VersionResponse, WeatherEnvelope,
    error_envelope,
};

const MAX_FORM_LENGTH: u64 = 1024;

/// The whole route tree: HTML pages, the JSON API, health and version.
pub fn routes(
    client: Arc<WeatherClient>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    index_route()
        .or(lookup_form_route())
        .or(lookup_route(client.clone()))
        .or(api_weather_route(client.clone()))
        .or(health_route(client))
        .or(version_route())
        .recover(handle_rejection)
}

fn with_client(
    client: Arc<WeatherClient>,
) -> impl Filter<Extract = (Arc<WeatherClient>,), Error = Infallible> + Clone {
    warp::any().map(move || client.clone())
}

fn index_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path::end().and(warp::get()).map(|| reply::html(pages::index(None)))
}

fn lookup_form_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("weather")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| reply::html(pages::index(None)))
}

fn lookup_route(
    client: Arc<WeatherClient>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("weather")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_LENGTH))
        .and(warp::body::form::<HashMap<String, String>>())
        .and(with_client(client))
        .and_then(handle_lookup)
}

fn api_weather_route(
    client: Arc<WeatherClient>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "weather" / String)
        .and(warp::get())
        .and(with_client(client))
        .and_then(handle_api_weather)
}

fn health_route(
    client: Arc<WeatherClient>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("health").and(warp::get()).and(with_client(client)).and_then(handle_health)
}

fn version_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "version").and(warp::get()).map(|| {
        reply::json(&VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            name: "weather-web",
            timestamp: Utc::now(),
        })
    })
}

async fn handle_api_weather(
    city: String,
    client: Arc<WeatherClient>,
) -> Result<impl Reply, Infallible> {
    match client.fetch(&city, None).await {
        Ok(record) => Ok(reply::with_status(
            reply::json(&WeatherEnvelope::success(record)),
            StatusCode::OK,
        )),
        Err(err) => {
            let (code, body) = error_envelope(&err);
            Ok(reply::with_status(reply::json(&body), code))
        }
    }
}

async fn handle_lookup(
    form: HashMap<String, String>,
    client: Arc<WeatherClient>,
) -> Result<impl Reply, Infallible> {
    let city = form.get("city").map_or("", |c| c.trim());

    if city.is_empty() {
        return Ok(reply::html(pages::index(Some("Enter a city name"))));
    }

    match client.fetch(city, None).await {
        Ok(record) => Ok(reply::html(pages::result(&record))),
        Err(err) => Ok(reply::html(pages::index(Some(&err.to_string())))),
    }
}

async fn handle_health(client: Arc<WeatherClient>) -> Result<impl Reply, Infallible> {
    let key_ok = client.validate_credential().await;

    Ok(reply::json(&HealthResponse {
        status: if key_ok { "healthy" } else { "unhealthy" },
        timestamp: Utc::now(),
        components: HealthComponents {
            weather_client: "OK",
            api_key: if key_ok { "OK" } else { "ERROR" },
        },
    }))
}

/// Unknown paths get the search page; everything else gets the generic
/// JSON error body.
async fn handle_rejection(rej: Rejection) -> Result<reply::Response, Infallible> {
    if rej.is_not_found() {
        let page = reply::html(pages::index(Some("Page not found")));
        return Ok(reply::with_status(page, StatusCode::NOT_FOUND).into_response());
    }

    error!("unhandled rejection: {rej:?}");
    let body = ErrorEnvelope::unexpected();
    Ok(reply::with_status(reply::json(&body), StatusCode::INTERNAL_SERVER_ERROR).into_response())
}
