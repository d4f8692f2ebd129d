//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive prompts and batch lookups
//! - Human-friendly output formatting

use clap::Parser;

mod cli;
mod display;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cmd = cli::Cli::parse();
    cmd.init_logging();

    let code = cmd.run().await;
    std::process::exit(code);
}
