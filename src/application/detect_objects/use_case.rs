use crate::{
    application::detect_objects::dto::DetectionRequest,
    domain::detection::entity::DetectionResult,
    infrastructure::{
        imaging::normalizer::{ImageNormalizer, ImagingError},
        providers::{DetectionProvider, ProviderError},
    },
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum DetectError {
    #[error(transparent)]
    Imaging(#[from] ImagingError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Relays one image to the detection provider and normalizes the answer.
///
/// Steps, each fail-fast:
/// 1. refuse to run without a provider credential
/// 2. decode the image and re-encode it as base64 PNG
/// 3. send it to the provider with the requested model and confidence
/// 4. wrap the provider's predictions into a [`DetectionResult`]
///
/// The image only ever lives in memory for the duration of the call.
pub struct DetectObjectsUseCase {
    provider: Arc<dyn DetectionProvider>,
}

impl DetectObjectsUseCase {
    pub fn new(provider: Arc<dyn DetectionProvider>) -> Self {
        Self { provider }
    }

    #[instrument(skip(self, request), fields(
        provider = self.provider.name(),
        model = %request.model_id,
        confidence = %request.confidence,
        source = request.image.kind(),
        image_size = request.image.len()
    ))]
    pub async fn execute(&self, request: DetectionRequest) -> Result<DetectionResult, DetectError> {
        if !self.provider.is_configured() {
            return Err(ProviderError::NotConfigured {
                provider: self.provider.display_name(),
            }
            .into());
        }

        let image = ImageNormalizer::normalize(request.image).await?;

        let detection = self
            .provider
            .detect(&request.model_id, request.confidence, image.base64_png)
            .await?;

        let result = DetectionResult::new(
            self.provider.name(),
            &request.model_id,
            detection.predictions,
        );
        info!(count = result.count, "detection relayed");

        Ok(result)
    }
}
