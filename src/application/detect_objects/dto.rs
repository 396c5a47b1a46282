use crate::domain::detection::{
    entity::ImageSource,
    value_objects::{Confidence, ModelId},
};

/// One inbound detection call, validated and ready to run.
#[derive(Debug, Clone)]
pub struct DetectionRequest {
    pub image: ImageSource,
    pub model_id: ModelId,
    pub confidence: Confidence,
}
