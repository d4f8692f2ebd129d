use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observation of current weather, produced by one successful
/// fetch and never mutated afterwards.
///
/// `wind_speed`, `wind_direction` and `visibility` stay `None` when the
/// provider omits them; they are never defaulted to zero. `timestamp` is the
/// wall-clock moment the payload was parsed, not the provider's own
/// observation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city_name: String,
    /// ISO country code, e.g. "JP".
    pub country: String,
    /// Rounded to one decimal place, in the configured unit system.
    pub temperature: f64,
    /// Rounded to one decimal place, in the configured unit system.
    pub feels_like: f64,
    /// Percent. Trusted as reported by the provider, not validated.
    pub humidity: u8,
    /// hPa.
    pub pressure: u32,
    /// Localized description, e.g. "clear sky".
    pub description: String,
    /// Short English category, e.g. "Clear".
    pub description_en: String,
    /// m/s.
    pub wind_speed: Option<f64>,
    /// Degrees, 0-359.
    pub wind_direction: Option<u16>,
    /// Meters.
    pub visibility: Option<u32>,
    pub timestamp: DateTime<Utc>,
}
