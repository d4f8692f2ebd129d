use thiserror::Error;

/// How a transport-level failure happened. The presentation layers treat all
/// of these as "possibly transient"; the kind only refines the hint shown to
/// the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The provider host could not be reached (refused, DNS, unreachable).
    Unreachable,
    /// Any other transport error, message wraps the underlying cause.
    Other,
}

/// Everything that can go wrong while fetching weather data.
///
/// The client never recovers from any of these itself; each one is surfaced
/// to the caller so the CLI and web layers can render it.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider reported the requested city as unknown (HTTP 404).
    #[error("city '{city}' was not found")]
    CityNotFound { city: String },

    /// The API key was rejected (HTTP 401) or missing at construction.
    #[error("{0}")]
    InvalidCredential(String),

    /// Transport-level failure. Never retried by the client.
    #[error("{message}")]
    Connection {
        kind: ConnectionKind,
        message: String,
    },

    /// Any other non-200 response, or a 200 response missing required
    /// fields (in which case `status` is 200 and the message names the
    /// field).
    #[error("{}", provider_display(.status, .message))]
    Provider {
        status: u16,
        message: Option<String>,
    },
}

fn provider_display(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(m) => m.clone(),
        None => format!("weather service responded with status {status}"),
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Connection {
                kind: ConnectionKind::Timeout,
                message: "request to the weather service timed out".to_string(),
            }
        } else if err.is_connect() {
            WeatherError::Connection {
                kind: ConnectionKind::Unreachable,
                message: "could not connect to the weather service".to_string(),
            }
        } else {
            WeatherError::Connection {
                kind: ConnectionKind::Other,
                message: format!("error talking to the weather service: {err}"),
            }
        }
    }
}
