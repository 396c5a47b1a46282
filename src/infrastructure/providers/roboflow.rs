use super::traits::{DetectionProvider, ProviderDetection, ProviderError};
use crate::{
    config::Config,
    domain::detection::value_objects::{Confidence, ModelId, ModelRoute},
};
use async_trait::async_trait;
use reqwest::{StatusCode, Url, header::CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const PROVIDER: &str = "Roboflow";
const FEATURES: &[&str] = &["object_detection", "classification", "segmentation"];

/// Client for the Roboflow hosted inference API.
///
/// The credential travels in the query string, the image as a base64 string
/// in a form-urlencoded body.
pub struct RoboflowProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RoboflowProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build Roboflow HTTP client: {}", e))?;

        Ok(Self::with_client(client, base_url, api_key))
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            config.roboflow_api_url.clone(),
            config.roboflow_api_key.clone(),
            config.provider_timeout(),
        )
    }

    /// `<base>/<workspace>/<version>` for versioned ids, `<base>/<model_id>`
    /// otherwise, with `api_key` and `confidence` in the query.
    pub fn endpoint_url(
        &self,
        api_key: &str,
        model: &ModelId,
        confidence: Confidence,
    ) -> Result<Url, ProviderError> {
        let path = match model.route() {
            ModelRoute::Versioned { workspace, version } => format!("{workspace}/{version}"),
            ModelRoute::Bare(id) => id.to_string(),
        };

        let mut url = Url::parse(&format!("{}/{}", self.base_url, path)).map_err(|e| {
            ProviderError::InvalidEndpoint {
                provider: PROVIDER,
                message: e.to_string(),
            }
        })?;

        url.query_pairs_mut()
            .append_pair("api_key", api_key)
            .append_pair("confidence", &confidence.to_string());

        Ok(url)
    }
}

fn classify_transport_error(err: reqwest::Error) -> ProviderError {
    // the URL carries the api key, keep it out of messages and logs
    let err = err.without_url();
    if err.is_timeout() {
        warn!(roboflow_timeout = %err);
        ProviderError::Timeout { provider: PROVIDER }
    } else {
        warn!(roboflow_transport = %err);
        ProviderError::Transport {
            provider: PROVIDER,
            message: err.to_string(),
        }
    }
}

fn extract_predictions(payload: Value) -> Vec<Value> {
    match payload {
        Value::Object(mut map) => match map.remove("predictions") {
            Some(Value::Array(predictions)) => predictions,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[async_trait]
impl DetectionProvider for RoboflowProvider {
    fn name(&self) -> &'static str {
        "roboflow"
    }

    fn display_name(&self) -> &'static str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn features(&self) -> &'static [&'static str] {
        FEATURES
    }

    #[instrument(skip(self, image_base64), fields(model = %model, confidence = %confidence))]
    async fn detect(
        &self,
        model: &ModelId,
        confidence: Confidence,
        image_base64: String,
    ) -> Result<ProviderDetection, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured { provider: PROVIDER })?;
        let url = self.endpoint_url(api_key, model, confidence)?;

        debug!(path = url.path(), payload_len = image_base64.len(), "sending inference request");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(image_base64)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if status != StatusCode::OK {
            warn!(status = %status, "Roboflow rejected inference request");
            return Err(ProviderError::Rejected {
                provider: PROVIDER,
                status,
                body,
            });
        }

        let payload: Value =
            serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let predictions = extract_predictions(payload);
        debug!(count = predictions.len(), "inference completed");

        Ok(ProviderDetection { predictions })
    }
}
