use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_CATALOG_URL: &str =
    "https://static-basket-01.wbbasket.ru/vol0/data/main-menu-ru-ru-v3.json";
pub const DEFAULT_LISTING_BASE_URL: &str = "https://catalog.wb.ru/catalog";
pub const DEFAULT_SITE_ORIGIN: &str = "https://www.wildberries.ru";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/115.0";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
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
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can use a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let catalog_url = or_default("WBSCRAPE_CATALOG_URL", DEFAULT_CATALOG_URL);
    let listing_base_url = or_default("WBSCRAPE_LISTING_BASE_URL", DEFAULT_LISTING_BASE_URL);
    let site_origin = or_default("WBSCRAPE_SITE_ORIGIN", DEFAULT_SITE_ORIGIN);
    let user_agent = or_default("WBSCRAPE_USER_AGENT", DEFAULT_USER_AGENT);
    let log_level = or_default("WBSCRAPE_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("WBSCRAPE_OUTPUT_DIR", "."));

    let dest = or_default("WBSCRAPE_DEST", "-1257786")
        .trim()
        .parse::<i64>()
        .map_err(|e| invalid("WBSCRAPE_DEST", e.to_string()))?;

    let request_timeout_secs = parse_u64("WBSCRAPE_REQUEST_TIMEOUT_SECS", "0")?;
    let retry_backoff_base_ms = parse_u64("WBSCRAPE_RETRY_BACKOFF_BASE_MS", "0")?;

    let max_pages = parse_u32("WBSCRAPE_MAX_PAGES", "50")?;
    if max_pages == 0 {
        return Err(invalid("WBSCRAPE_MAX_PAGES", "must be at least 1".to_string()));
    }

    let max_retries = match lookup("WBSCRAPE_MAX_RETRIES") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.trim()
                .parse::<u32>()
                .map_err(|e| invalid("WBSCRAPE_MAX_RETRIES", e.to_string()))?,
        ),
        _ => None,
    };

    Ok(AppConfig {
        catalog_url,
        listing_base_url,
        site_origin,
        dest,
        user_agent,
        request_timeout_secs,
        max_pages,
        max_retries,
        retry_backoff_base_ms,
        output_dir,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
