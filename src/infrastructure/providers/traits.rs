use crate::domain::detection::value_objects::{Confidence, ModelId};
use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ProviderDetection {
    pub predictions: Vec<Value>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API key not configured")]
    NotConfigured { provider: &'static str },

    #[error("{provider} request timed out")]
    Timeout { provider: &'static str },

    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned an unreadable response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} endpoint could not be built: {message}")]
    InvalidEndpoint {
        provider: &'static str,
        message: String,
    },

    /// Provider answered with anything but 200; body kept verbatim.
    #[error("{provider} API error ({status})")]
    Rejected {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },
}

#[async_trait]
pub trait DetectionProvider: Send + Sync {
    /// Machine name used in responses, e.g. "roboflow"
    fn name(&self) -> &'static str;

    /// Human name used in error messages, e.g. "Roboflow"
    fn display_name(&self) -> &'static str;

    /// Whether a credential is available
    fn is_configured(&self) -> bool;

    /// Capabilities advertised on the info endpoint
    fn features(&self) -> &'static [&'static str];

    /// Send one PNG image (base64) for inference
    async fn detect(
        &self,
        model: &ModelId,
        confidence: Confidence,
        image_base64: String,
    ) -> Result<ProviderDetection, ProviderError>;
}
