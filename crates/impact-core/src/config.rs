use crate::app_config::{AppConfig, Environment, SearchLocale};
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

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("IMPACT_ENV", "development"))?;

    let bind_addr = parse_addr("IMPACT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("IMPACT_LOG_LEVEL", "info");
    let merchants_path = PathBuf::from(or_default(
        "IMPACT_MERCHANTS_PATH",
        "./config/merchants.yaml",
    ));

    let serpapi_key = optional("SERPAPI_KEY");
    let serpapi_base_url = or_default("IMPACT_SERPAPI_BASE_URL", "https://serpapi.com/");
    let suggest_base_url = or_default(
        "IMPACT_SUGGEST_BASE_URL",
        "http://google.com/complete/search",
    );

    let defaults = SearchLocale::default();
    let search_locale = SearchLocale {
        domain: or_default("IMPACT_SEARCH_DOMAIN", &defaults.domain),
        country: or_default("IMPACT_SEARCH_COUNTRY", &defaults.country),
        language: or_default("IMPACT_SEARCH_LANGUAGE", &defaults.language),
        num_results: parse_u32(
            "IMPACT_SEARCH_NUM_RESULTS",
            &defaults.num_results.to_string(),
        )?,
    };

    let http_timeout_secs = parse_u64("IMPACT_HTTP_TIMEOUT_SECS", "30")?;
    let http_user_agent = or_default("IMPACT_HTTP_USER_AGENT", "impact/0.1 (price-compare)");

    let db_max_connections = parse_u32("IMPACT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("IMPACT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("IMPACT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let rate_limit_per_minute = parse_usize("IMPACT_RATE_LIMIT_PER_MINUTE", "120")?;
    if rate_limit_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "IMPACT_RATE_LIMIT_PER_MINUTE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        merchants_path,
        serpapi_key,
        serpapi_base_url,
        suggest_base_url,
        search_locale,
        http_timeout_secs,
        http_user_agent,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "IMPACT_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
