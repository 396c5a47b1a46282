use super::{
    errors::DomainError,
    value_objects::{ImageFileName, ModelId},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the image of a detection request came from.
///
/// Resolved once at the HTTP boundary; nothing downstream looks at request
/// content types again.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Multipart upload, file name already checked against the allow-list.
    UploadedFile { file_name: ImageFileName, bytes: Bytes },
    /// Base64 text from a JSON body, data-URI prefix already removed.
    InlineBase64 { data: String },
}

impl ImageSource {
    pub fn uploaded(file_name: ImageFileName, bytes: Bytes) -> Self {
        Self::UploadedFile { file_name, bytes }
    }

    /// Builds an inline source from raw JSON text, dropping any
    /// `data:<mime>;base64,` prefix and line wrapping.
    pub fn inline(raw: &str) -> Result<Self, DomainError> {
        let data: String = strip_data_uri(raw)
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if data.is_empty() {
            return Err(DomainError::NoImage);
        }
        Ok(Self::InlineBase64 { data })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::UploadedFile { .. } => "upload",
            Self::InlineBase64 { .. } => "base64",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::UploadedFile { bytes, .. } => bytes.len(),
            Self::InlineBase64 { data } => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything after the first comma when one is present, the whole input
/// otherwise. Base64 never contains a comma.
pub fn strip_data_uri(raw: &str) -> &str {
    match raw.split_once(',') {
        Some((_, payload)) => payload,
        None => raw,
    }
}

/// Normalized answer returned to callers for a successful detection.
///
/// # Invariants
/// - `count == predictions.len()`
/// - predictions are passed through exactly as the provider sent them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub provider: String,
    pub model: String,
    pub predictions: Vec<Value>,
    pub count: usize,
}

impl DetectionResult {
    pub fn new(provider: &str, model: &ModelId, predictions: Vec<Value>) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.to_string(),
            count: predictions.len(),
            predictions,
        }
    }
}
