use thiserror::Error;

use crate::app_config::AppConfig;

pub const DEFAULT_SEARCH_ENDPOINT: &str =
    "https://lkb-1.store-uk1.advancedcommerce.services/api/js/query";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_key = require("LOOKBOOK_API_KEY")?;
    let secret_key = require("LOOKBOOK_SECRET_KEY")?;

    let data_dir = PathBuf::from(or_default("LOOKBOOK_DATA_DIR", "./data"));
    let search_endpoint = or_default("LOOKBOOK_SEARCH_ENDPOINT", DEFAULT_SEARCH_ENDPOINT);
    let search_timeout_secs = parse_u64("LOOKBOOK_SEARCH_TIMEOUT_SECS", "30")?;
    let search_page_size = parse_u32("LOOKBOOK_SEARCH_PAGE_SIZE", "20")?;
    let log_level = or_default("LOOKBOOK_LOG_LEVEL", "info");

    Ok(AppConfig {
        data_dir,
        search_endpoint,
        api_key,
        secret_key,
        search_timeout_secs,
        search_page_size,
        log_level,
    })
}
