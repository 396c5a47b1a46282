//! Application configuration loading from environment variables.
//!
//! All configuration is read once at startup (after `dotenvy` has merged any
//! `.env` file into the process environment) and handed to the router and the
//! detection provider explicitly. Nothing reads the environment afterwards.
//!
//! # Environment Variables
//!
//! - `ROBOFLOW_API_KEY`: Roboflow credential. When unset or empty the detect
//!   endpoint answers 400 and `/health` reports the provider as unconfigured.
//! - `ROBOFLOW_API_URL`: Provider base URL (default: "https://detect.roboflow.com")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 5000)
//! - `PROVIDER_TIMEOUT_SECS`: Outbound request timeout (default: 30)
//! - `MAX_UPLOAD_BYTES`: Request body cap in bytes (default: 16 MiB)
//! - `DEFAULT_MODEL_ID`: Model used when a request names none (default: "coco/3")
//! - `DEFAULT_CONFIDENCE`: Confidence used when a request gives none (default: 40)
//! - `RUST_LOG`: Logging filter (default: "info,vision_api=debug,tower_http=debug")

use crate::domain::detection::value_objects::{Confidence, ModelId};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ROBOFLOW_API_URL: &str = "https://detect.roboflow.com";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Roboflow API key; `None` disables detection
    pub roboflow_api_key: Option<String>,

    /// Roboflow inference base URL, without trailing slash
    pub roboflow_api_url: String,

    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Timeout applied to every provider call
    pub provider_timeout_secs: u64,

    /// Maximum accepted request body in bytes
    pub max_upload_bytes: usize,

    /// Model identifier used when the caller does not send one
    pub default_model_id: String,

    /// Confidence threshold (0-100) used when the caller does not send one
    pub default_confidence: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed to the
    /// expected type, or if the request defaults are out of range.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            roboflow_api_key: env_optional("ROBOFLOW_API_KEY"),
            roboflow_api_url: env_or("ROBOFLOW_API_URL", DEFAULT_ROBOFLOW_API_URL.to_string())?
                .trim_end_matches('/')
                .to_string(),
            host: env_or("HOST", "0.0.0.0".to_string())?,
            port: env_or("PORT", 5000)?,
            provider_timeout_secs: env_or("PROVIDER_TIMEOUT_SECS", 30)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            default_model_id: env_or("DEFAULT_MODEL_ID", "coco/3".to_string())?,
            default_confidence: env_or("DEFAULT_CONFIDENCE", 40.0)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the request defaults with the same rules applied to caller
    /// input, so a bad default fails startup instead of every request.
    pub fn validate(&self) -> anyhow::Result<()> {
        ModelId::new(self.default_model_id.clone())
            .map_err(|e| anyhow::anyhow!("DEFAULT_MODEL_ID: {}", e))?;
        Confidence::new(self.default_confidence)
            .map_err(|e| anyhow::anyhow!("DEFAULT_CONFIDENCE: {}", e))?;
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        Ok(())
    }

    pub fn roboflow_configured(&self) -> bool {
        self.roboflow_api_key.is_some()
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Human readable body cap, e.g. "16MB".
    pub fn max_upload_label(&self) -> String {
        let mib = self.max_upload_bytes as f64 / (1024.0 * 1024.0);
        if mib.fract() == 0.0 {
            format!("{}MB", mib as u64)
        } else {
            format!("{:.1}MB", mib)
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roboflow_api_key: None,
            roboflow_api_url: DEFAULT_ROBOFLOW_API_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            provider_timeout_secs: 30,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_model_id: "coco/3".to_string(),
            default_confidence: 40.0,
        }
    }
}

/// Load an optional environment variable, treating blank values as unset.
fn env_optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
