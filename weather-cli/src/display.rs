//! Terminal output: colors, icons and the weather report layout.

use std::io::{IsTerminal, stdout};

use chrono::Local;
use crossterm::style::{Color, Stylize};
use weather_core::{WeatherError, WeatherRecord};

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const WEATHER_ICONS: &[(&str, &str)] = &[
    ("clear", "☀️"),
    ("clouds", "☁️"),
    ("rain", "🌧️"),
    ("drizzle", "🌦️"),
    ("thunderstorm", "⛈️"),
    ("snow", "❄️"),
    ("mist", "🌫️"),
    ("fog", "🌫️"),
    ("haze", "🌫️"),
];

/// Prints styled console messages; all color flows through here so one
/// switch turns it off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    colored: bool,
}

impl Painter {
    pub fn new(want_color: bool) -> Self {
        let term_ok = std::env::var("TERM").map_or(true, |t| t != "dumb");
        Self { colored: want_color && stdout().is_terminal() && term_ok }
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.colored {
            return text.to_string();
        }
        let styled = text.with(color);
        if bold { styled.bold().to_string() } else { styled.to_string() }
    }

    pub fn header(&self, title: &str) {
        println!();
        println!("{}", self.paint(&"=".repeat(50), Color::Cyan, true));
        println!("{}", self.paint(&format!("  {title}"), Color::Cyan, true));
        println!("{}", self.paint(&"=".repeat(50), Color::Cyan, true));
        println!();
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.paint(&format!("✓ {message}"), Color::Green, true));
    }

    pub fn error(&self, message: &str) {
        println!("{}", self.paint(&format!("✗ Error: {message}"), Color::Red, true));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.paint(&format!("⚠ Warning: {message}"), Color::Yellow, true));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.paint(&format!("ℹ {message}"), Color::Blue, false));
    }

    /// Lay out one weather report.
    pub fn render_record(&self, record: &WeatherRecord, detailed: bool) -> String {
        let mut lines = Vec::new();

        lines.push(self.paint(
            &format!("📍 {}, {}", record.city_name, record.country),
            Color::Cyan,
            true,
        ));
        let icon = weather_icon(&record.description_en).map_or(String::new(), |i| format!("{i} "));
        lines.push(self.paint(&format!("{icon}{}", record.description), Color::Blue, true));
        lines.push(String::new());

        let temp_color = if record.temperature > 25.0 {
            Color::Red
        } else if record.temperature < 10.0 {
            Color::Blue
        } else {
            Color::Green
        };
        lines.push(self.paint(
            &format!("🌡️  Temperature: {:.1} °C", record.temperature),
            temp_color,
            true,
        ));
        lines.push(format!("   Feels like: {:.1} °C", record.feels_like));
        lines.push(String::new());

        lines.push(format!("💧 Humidity: {}%", record.humidity));
        lines.push(format!("🎈 Pressure: {} hPa", record.pressure));

        if let Some(speed) = record.wind_speed {
            let mut wind = format!("💨 Wind: {speed} m/s");
            if let Some(deg) = record.wind_direction {
                wind.push_str(&format!(" ({})", compass_point(deg)));
            }
            lines.push(wind);
        }
        if let Some(vis) = record.visibility {
            lines.push(format!("👁️  Visibility: {:.1} km", f64::from(vis) / 1000.0));
        }

        lines.push(String::new());
        let fetched = record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
        lines.push(self.paint(&format!("🕐 Fetched: {fetched}"), Color::Magenta, false));

        if detailed {
            lines.push(String::new());
            lines.push(self.paint("🔍 Details", Color::Cyan, true));
            lines.push("-".repeat(30));
            lines.push("Source: OpenWeatherMap API".to_string());
            lines.push(format!("Country code: {}", record.country));
            lines.push(format!("Category: {}", record.description_en));
            if let Some(deg) = record.wind_direction {
                lines.push(format!("Wind direction: {deg}°"));
            }
        }

        lines.join("\n")
    }

    /// Render a failure with a hint the user can act on.
    pub fn render_error(&self, err: &WeatherError) {
        match err {
            WeatherError::CityNotFound { .. } => {
                self.error(&err.to_string());
                self.info("Try the English spelling of the city name (e.g. Tokyo, London, New York)");
            }
            WeatherError::InvalidCredential(_) => {
                self.error(&err.to_string());
                self.api_key_instructions();
            }
            WeatherError::Connection { .. } => {
                self.error(&err.to_string());
                self.connection_troubleshooting();
            }
            WeatherError::Provider { status, .. } => {
                self.error(&err.to_string());
                if *status == 429 {
                    self.warning(
                        "The API usage limit may have been reached; wait a while and retry",
                    );
                }
            }
        }
    }

    pub fn api_key_instructions(&self) {
        println!();
        self.info("To set up an API key:");
        println!("1. Create an account at https://openweathermap.org/api");
        println!("2. Copy your API key");
        println!("3. Export it, or put it in .env: OPENWEATHER_API_KEY=your_api_key_here");
    }

    fn connection_troubleshooting(&self) {
        println!();
        self.info("Connection troubleshooting:");
        println!("1. Check your internet connection");
        println!("2. Check proxy and firewall settings");
        println!("3. Wait a while and retry");
    }
}

fn weather_icon(category: &str) -> Option<&'static str> {
    let lower = category.to_ascii_lowercase();
    WEATHER_ICONS.iter().find(|(key, _)| lower.contains(key)).map(|(_, icon)| *icon)
}

fn compass_point(deg: u16) -> &'static str {
    let index = (f64::from(deg) / 22.5).round() as usize % 16;
    COMPASS_POINTS[index]
}
