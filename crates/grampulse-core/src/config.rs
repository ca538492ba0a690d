use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the real environment so
/// tests can drive it with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

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

    let env = parse_environment(&or_default("GRAMPULSE_ENV", "development"));

    let bind_addr = parse_addr("GRAMPULSE_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("GRAMPULSE_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("GRAMPULSE_DATA_DIR", "./data"));
    let default_identity = or_default("GRAMPULSE_DEFAULT_IDENTITY", "swiggyindia");

    let retrain_token = lookup("GRAMPULSE_RETRAIN_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    if retrain_token.is_none() && env != Environment::Development {
        return Err(ConfigError::MissingEnvVar(
            "GRAMPULSE_RETRAIN_TOKEN".to_string(),
        ));
    }

    let scraper_request_timeout_secs = parse_u64("GRAMPULSE_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_min_delay_ms = parse_u64("GRAMPULSE_SCRAPER_MIN_DELAY_MS", "2000")?;
    let scraper_max_delay_ms = parse_u64("GRAMPULSE_SCRAPER_MAX_DELAY_MS", "5000")?;
    let scraper_max_retries = parse_u32("GRAMPULSE_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("GRAMPULSE_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;

    if scraper_min_delay_ms > scraper_max_delay_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "GRAMPULSE_SCRAPER_MIN_DELAY_MS".to_string(),
            reason: format!(
                "minimum delay {scraper_min_delay_ms}ms exceeds maximum {scraper_max_delay_ms}ms"
            ),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_dir,
        default_identity,
        retrain_token,
        scraper_request_timeout_secs,
        scraper_min_delay_ms,
        scraper_max_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
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
