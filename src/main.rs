//! Homeline - SMS Assistant for Real Estate Teams
//!
//! CLI entry point for the Homeline server.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

mod api;
mod cli;
mod server;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let cli = cli::Cli::parse();
    let config = server::load_config().context("Failed to load configuration")?;
    let _log_guard = server::init_logging(&config.logging)?;

    if !dotenv_loaded {
        warn!(".env file not found; reading secrets from the process environment only");
    }

    cli::run(cli, config).await
}
