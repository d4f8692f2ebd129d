//! Binary crate for the weather web server.
//!
//! Serves a JSON API over the core weather client plus a minimal HTML
//! search page.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::info;
use weather_core::{Config, WeatherClient, api_key_from_env};

mod pages;
mod response;
mod routes;

#[derive(Debug, Parser)]
#[command(name = "weather-web", version, about = "Weather lookup web server")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Path to the configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    let api_key = api_key_from_env()?;
    let client = Arc::new(WeatherClient::new(&config, api_key)?);

    info!("weather web server listening on http://{}:{}", args.host, args.port);
    warp::serve(routes::routes(client)).run((args.host, args.port)).await;

    Ok(())
}
