use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
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
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let api_token_hash_salt = require("PEPGEN_API_TOKEN_HASH_SALT")?;
    let genai_api_key = require("PEPGEN_GENAI_API_KEY")?;
    let storage_base_url = require("PEPGEN_STORAGE_BASE_URL")?;
    let storage_service_key = require("PEPGEN_STORAGE_SERVICE_KEY")?;

    let env = parse_environment(&or_default("PEPGEN_ENV", "development"));

    // The external scheduled-trigger route must be guarded outside development.
    let cron_secret = lookup("PEPGEN_CRON_SECRET").ok();
    if cron_secret.is_none() && env == Environment::Production {
        return Err(ConfigError::MissingEnvVar("PEPGEN_CRON_SECRET".to_string()));
    }

    let bind_addr = parse_addr("PEPGEN_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PEPGEN_LOG_LEVEL", "info");

    let genai_base_url = or_default("PEPGEN_GENAI_BASE_URL", "https://openrouter.ai/api/v1");
    let genai_text_model = or_default("PEPGEN_GENAI_TEXT_MODEL", "openai/gpt-4o");
    let genai_image_model = or_default(
        "PEPGEN_GENAI_IMAGE_MODEL",
        "google/gemini-2.5-flash-image-preview",
    );
    let genai_request_timeout_secs = parse_u64("PEPGEN_GENAI_REQUEST_TIMEOUT_SECS", "120")?;

    let storage_bucket = or_default("PEPGEN_STORAGE_BUCKET", "article-images");

    let author_name = or_default("PEPGEN_AUTHOR_NAME", "Peptide Research Team");
    let author_role = or_default("PEPGEN_AUTHOR_ROLE", "Editorial");

    let schedule_tick_cron = or_default("PEPGEN_SCHEDULE_TICK_CRON", "0 */5 * * * *");

    let db_max_connections = parse_u32("PEPGEN_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("PEPGEN_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("PEPGEN_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        api_token_hash_salt,
        cron_secret,
        genai_base_url,
        genai_api_key,
        genai_text_model,
        genai_image_model,
        genai_request_timeout_secs,
        storage_base_url,
        storage_bucket,
        storage_service_key,
        author_name,
        author_role,
        schedule_tick_cron,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
