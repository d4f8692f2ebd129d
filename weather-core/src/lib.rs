//! Core library for the weather lookup app.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The OpenWeatherMap client and its error taxonomy
//! - The shared weather record model
//!
//! It is used by `weather-cli` and `weather-web`, but can also be reused by
//! other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::WeatherClient;
pub use config::{API_KEY_VAR, ApiConfig, Config, DefaultsConfig, api_key_from_env};
pub use error::{ConnectionKind, WeatherError};
pub use model::WeatherRecord;
