use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use inquire::{Confirm, InquireError, Text};
use weather_core::{Config, WeatherClient, api_key_from_env};

use crate::display::Painter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city, from OpenWeatherMap")]
pub struct Cli {
    /// City names; more than one runs a batch lookup.
    pub cities: Vec<String>,

    /// Start the interactive prompt (default when no cities are given).
    #[arg(short, long)]
    pub interactive: bool,

    /// Show extra details for each city.
    #[arg(short, long)]
    pub detailed: bool,

    /// Path to the configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn init_logging(&self) {
        let level = if self.verbose { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }

    pub async fn run(self) -> i32 {
        let painter = Painter::new(!self.no_color);

        let Some((config, client)) = self.initialize(&painter) else {
            return 1;
        };

        if !self.validate_setup(&client, &painter).await {
            return 1;
        }

        if self.interactive || self.cities.is_empty() {
            self.interactive_mode(&config, &client, &painter).await
        } else {
            self.batch_mode(&client, &painter).await
        }
    }

    fn initialize(&self, painter: &Painter) -> Option<(Config, WeatherClient)> {
        let config = match Config::load(self.config.as_deref()).context("failed to load configuration") {
            Ok(c) => c,
            Err(e) => {
                painter.error(&format!("{e:#}"));
                return None;
            }
        };

        let api_key = match api_key_from_env() {
            Ok(k) => k,
            Err(e) => {
                painter.error(&e.to_string());
                painter.api_key_instructions();
                return None;
            }
        };

        match WeatherClient::new(&config, api_key).context("failed to initialize the weather client") {
            Ok(client) => Some((config, client)),
            Err(e) => {
                painter.error(&format!("{e:#}"));
                None
            }
        }
    }

    /// Probe the API key before doing any real work. A rejected key aborts;
    /// anything else (including a provider outage) lets the run continue.
    async fn validate_setup(&self, client: &WeatherClient, painter: &Painter) -> bool {
        painter.info("Validating API key...");
        if client.validate_credential().await {
            painter.success("API key accepted");
            true
        } else {
            painter.error("the API key was rejected by the weather service");
            painter.api_key_instructions();
            false
        }
    }

    async fn lookup(&self, client: &WeatherClient, painter: &Painter, city: &str) -> bool {
        painter.info(&format!("Fetching weather for '{city}'..."));

        match client.fetch(city, None).await {
            Ok(record) => {
                painter.success("Weather fetched");
                println!();
                println!("{}", painter.render_record(&record, self.detailed));
                true
            }
            Err(err) => {
                painter.render_error(&err);
                false
            }
        }
    }

    async fn batch_mode(&self, client: &WeatherClient, painter: &Painter) -> i32 {
        painter.header(&format!("Weather lookup - {} cities", self.cities.len()));

        let mut succeeded = 0;
        for (i, city) in self.cities.iter().enumerate() {
            println!();
            println!("[{}/{}] {city}", i + 1, self.cities.len());
            println!("{}", "-".repeat(40));

            if self.lookup(client, painter, city).await {
                succeeded += 1;
            }
        }

        println!();
        painter.header("Results");
        painter.success(&format!("Succeeded: {succeeded}/{} cities", self.cities.len()));
        if succeeded < self.cities.len() {
            painter
                .error(&format!("Failed: {}/{} cities", self.cities.len() - succeeded, self.cities.len()));
            return 1;
        }
        0
    }

    async fn interactive_mode(
        &self,
        config: &Config,
        client: &WeatherClient,
        painter: &Painter,
    ) -> i32 {
        painter.header("Weather lookup - interactive mode");
        painter.info("Type 'quit', 'exit' or 'q' to leave");
        println!();

        let default_city = config.defaults.city.as_str();

        loop {
            let city = match Text::new("City name:").with_default(default_city).prompt() {
                Ok(input) => input.trim().to_string(),
                Err(InquireError::OperationInterrupted) => {
                    painter.info("Cancelled");
                    return 130;
                }
                Err(InquireError::OperationCanceled) => return 0,
                Err(e) => {
                    painter.error(&format!("input error: {e}"));
                    return 1;
                }
            };

            if city.is_empty() {
                painter.warning("No city name given");
                continue;
            }

            if matches!(city.to_lowercase().as_str(), "quit" | "exit" | "q") {
                painter.info("Bye");
                return 0;
            }

            let ok = self.lookup(client, painter, &city).await;

            println!();
            let question = if ok { "Look up another city?" } else { "Try again?" };
            match Confirm::new(question).with_default(false).prompt() {
                Ok(true) => println!(),
                Ok(false) => return 0,
                Err(InquireError::OperationInterrupted) => return 130,
                Err(_) => return 0,
            }
        }
    }
}
