//! Configuration Module
//!
//! Reads runtime settings from the environment.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without the `/api/v1` prefix
    pub backend_base_url: String,
    /// Publishable key handed to the payment UI
    pub stripe_public_key: Option<String>,
    /// Deployment environment name (`production` silences verbose logs)
    pub environment: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Override for the storage/log root
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `SKILLBRIDGE_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_base_url = lookup("SKILLBRIDGE_BACKEND_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if !backend_base_url.starts_with("http://") && !backend_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(backend_base_url));
        }

        let request_timeout = match lookup("SKILLBRIDGE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                if secs == 0 {
                    return Err(ConfigError::InvalidTimeout(raw));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            backend_base_url: backend_base_url.trim_end_matches('/').to_string(),
            stripe_public_key: lookup("SKILLBRIDGE_STRIPE_PUBLIC_KEY").filter(|v| !v.is_empty()),
            environment: lookup("SKILLBRIDGE_ENV").unwrap_or_else(|| "development".to_string()),
            request_timeout,
            data_dir: lookup("SKILLBRIDGE_DATA_DIR").map(PathBuf::from),
        })
    }

    /// Whether verbose logging should be suppressed
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Root directory for stored data and logs
    pub fn data_root(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("SkillBridge")
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: DEFAULT_API_URL.to_string(),
            stripe_public_key: None,
            environment: "development".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            data_dir: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid backend base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid request timeout: {0}")]
    InvalidTimeout(String),
}
