use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid file")]
    InvalidFile,
    #[error("No image provided")]
    NoImage,
    #[error("Invalid model_id: {0}")]
    InvalidModelId(String),
    #[error("Invalid confidence: {0}")]
    InvalidConfidence(String),
}
