use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = lookup("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());
    let log_level = or_default("FUELWATCH_LOG_LEVEL", "info");
    let retailers_path = lookup("FUELWATCH_RETAILERS_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    let db_max_connections = parse_u32("FUELWATCH_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("FUELWATCH_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FUELWATCH_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let fetch_timeout_secs = parse_u64("FUELWATCH_FETCH_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("FUELWATCH_USER_AGENT", "UK-Fuel-Price-Comparison/1.0");
    let max_concurrent_retailers = parse_usize("FUELWATCH_MAX_CONCURRENT_RETAILERS", "1")?;
    let station_batch_size = parse_usize("FUELWATCH_STATION_BATCH_SIZE", "100")?;

    if station_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FUELWATCH_STATION_BATCH_SIZE".to_string(),
            reason: "batch size must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        log_level,
        retailers_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        fetch_timeout_secs,
        user_agent,
        max_concurrent_retailers,
        station_batch_size,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
