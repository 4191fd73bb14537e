//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Environment name from `HOMELINE_ENV`
pub fn environment() -> String {
    std::env::var("HOMELINE_ENV").unwrap_or_else(|_| "development".to_string())
}

/// Whether `HOMELINE_ENV` names production
pub fn is_production() -> bool {
    environment().eq_ignore_ascii_case("production")
}

fn defaults() -> ConfigBuilder<config::builder::DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}

// HOMELINE_STORE__URL: one "_" after the prefix, "__" between keys.
// Values stay strings so E.164 numbers keep their "+"; numeric fields are
// converted during deserialization.
fn env_source() -> Environment {
    Environment::with_prefix("HOMELINE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(false)
}

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = defaults()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", environment())).required(false))
        .add_source(File::with_name("config/local").required(false))
        .add_source(env_source())
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
