use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const MIN_PIN_LIMIT: u32 = 1;
pub const MAX_PIN_LIMIT: u32 = 20;

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
/// Every variable has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        parse_flag(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{raw}'"),
        })
    };

    let env = parse_environment(&or_default("FOODMAP_ENV", "development"))?;

    let api_base_url = or_default("FOODMAP_API_BASE_URL", "http://localhost:8000");
    if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOODMAP_API_BASE_URL".to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }

    let log_level = or_default("FOODMAP_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("FOODMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("FOODMAP_USER_AGENT", "foodmap/0.1 (food-provider-search)");
    let default_pin_limit = parse_u32("FOODMAP_DEFAULT_PIN_LIMIT", "5")?
        .clamp(MIN_PIN_LIMIT, MAX_PIN_LIMIT);
    let lock_approved = parse_bool("FOODMAP_LOCK_APPROVED", "false")?;
    let multi_select = parse_bool("FOODMAP_MULTI_SELECT", "true")?;

    Ok(AppConfig {
        env,
        api_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        default_pin_limit,
        lock_approved,
        multi_select,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOODMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
