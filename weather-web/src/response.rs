//! Wire shapes for the JSON endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use warp::http::StatusCode;
use weather_core::{WeatherError, WeatherRecord};

/// Success envelope for `/api/weather/<city>`.
#[derive(Debug, Serialize)]
pub struct WeatherEnvelope {
    pub status: &'static str,
    pub data: WeatherRecord,
}

impl WeatherEnvelope {
    pub fn success(data: WeatherRecord) -> Self {
        Self { status: "success", data }
    }
}

/// Error envelope shared by all JSON endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub error: String,
    pub error_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorEnvelope {
    /// Fallback body for conditions outside the weather error taxonomy.
    pub fn unexpected() -> Self {
        Self {
            status: "error",
            error: "an unexpected error occurred".to_string(),
            error_type: "unexpected_error",
            status_code: None,
        }
    }
}

/// Map a client failure to its HTTP status and wire error shape.
pub fn error_envelope(err: &WeatherError) -> (StatusCode, ErrorEnvelope) {
    let (code, error_type, status_code) = match err {
        WeatherError::CityNotFound { .. } => (StatusCode::NOT_FOUND, "city_not_found", None),
        WeatherError::InvalidCredential(_) => (StatusCode::UNAUTHORIZED, "api_key_error", None),
        WeatherError::Connection { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "connection_error", None)
        }
        WeatherError::Provider { status, .. } => {
            (StatusCode::BAD_GATEWAY, "api_response_error", Some(*status))
        }
    };

    (
        code,
        ErrorEnvelope { status: "error", error: err.to_string(), error_type, status_code },
    )
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub components: HealthComponents,
}

#[derive(Debug, Serialize)]
pub struct HealthComponents {
    pub weather_client: &'static str,
    pub api_key: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub name: &'static str,
    pub timestamp: DateTime<Utc>,
}
