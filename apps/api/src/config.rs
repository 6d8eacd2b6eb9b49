use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RUST_LOG: &str = "info";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Service configuration loaded from environment variables.
/// Every variable has a default; a present but unparseable value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Request body cap for document imports.
    pub max_upload_bytes: usize,
    pub cors_permissive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            rust_log: DEFAULT_RUST_LOG.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_permissive: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_source(|key| std::env::var(key).ok())
    }

    fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        Ok(Config {
            port: parse_or(&get, "PORT", defaults.port)?,
            rust_log: get("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            cors_permissive: parse_or(&get, "CORS_PERMISSIVE", defaults.cors_permissive)?,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
