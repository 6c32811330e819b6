//! Configuration module
//!
//! The console only needs to know where the backend lives and a few timing
//! knobs. Everything comes from the environment (optionally via a `.env`
//! file).

use std::env;
use std::time::Duration;

use crate::error::ConsoleError;

const DEFAULT_API_URL: &str = "http://localhost:3001/api";
const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
const DEFAULT_URL_EXPIRATION_MINUTES: u32 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_UPLOAD_PATH: &str = "/assets/upload";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL every endpoint path is appended to (no trailing slash).
    pub api_url: String,
    pub poll_interval_ms: u64,
    /// Expiration requested for presigned URLs.
    pub url_expiration_minutes: u32,
    pub request_timeout_secs: u64,
    /// `/assets/upload` or `/assets`, depending on the backend.
    pub upload_path: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            url_expiration_minutes: DEFAULT_URL_EXPIRATION_MINUTES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Load from ADCONSOLE_* variables (API_URL is accepted for the base URL).
    pub fn from_env() -> Result<Self, ConsoleError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset variables fall back to
    /// defaults; set but unparseable numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConsoleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("ADCONSOLE_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let poll_interval_ms = parse_var(
            &lookup,
            "ADCONSOLE_POLL_INTERVAL_MS",
            DEFAULT_POLL_INTERVAL_MS,
        )?;
        let url_expiration_minutes = parse_var(
            &lookup,
            "ADCONSOLE_URL_EXPIRATION_MINUTES",
            DEFAULT_URL_EXPIRATION_MINUTES,
        )?;
        let request_timeout_secs = parse_var(
            &lookup,
            "ADCONSOLE_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let upload_path = lookup("ADCONSOLE_UPLOAD_PATH")
            .map(|p| normalize_path(&p))
            .unwrap_or_else(|| DEFAULT_UPLOAD_PATH.to_string());

        let config = Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            poll_interval_ms,
            url_expiration_minutes,
            request_timeout_secs,
            upload_path,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConsoleError> {
        if self.api_url.is_empty() {
            return Err(ConsoleError::Config("API URL must not be empty".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "API URL must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConsoleError::Config(
                "ADCONSOLE_POLL_INTERVAL_MS must be greater than 0".to_string(),
            ));
        }
        if self.url_expiration_minutes == 0 {
            return Err(ConsoleError::Config(
                "ADCONSOLE_URL_EXPIRATION_MINUTES must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConsoleError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|_| {
            ConsoleError::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))
        }),
        _ => Ok(default),
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
