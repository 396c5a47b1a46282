use super::errors::DomainError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

lazy_static! {
    static ref MODEL_ID_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9._-]+(/[A-Za-z0-9._-]+)*$").unwrap();
}

/// Image file extensions accepted on upload (lowercase).
pub const ALLOWED_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

/// Provider model identifier, either `<workspace>/<version>` or a bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModelId {
    #[validate(length(min = 1, max = 200), regex(path = *MODEL_ID_REGEX))]
    pub value: String,
}

/// How a model id maps onto the provider's URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRoute<'a> {
    Versioned { workspace: &'a str, version: &'a str },
    Bare(&'a str),
}

impl ModelId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        let model_id = Self {
            value: value.trim().to_string(),
        };
        model_id
            .validate()
            .map_err(|_| DomainError::InvalidModelId(model_id.value.clone()))?;
        // dot segments would be collapsed by URL normalization
        if model_id.value.split('/').any(|s| s == "." || s == "..") {
            return Err(DomainError::InvalidModelId(model_id.value));
        }
        Ok(model_id)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Exactly two non-empty segments address a versioned model; anything
    /// else is passed to the provider as a single path.
    pub fn route(&self) -> ModelRoute<'_> {
        let mut parts = self.value.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(workspace), Some(version), None)
                if !workspace.is_empty() && !version.is_empty() =>
            {
                ModelRoute::Versioned { workspace, version }
            }
            _ => ModelRoute::Bare(&self.value),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Detection confidence threshold in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Confidence {
    #[validate(range(min = 0.0, max = 100.0))]
    pub value: f64,
}

impl Confidence {
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::InvalidConfidence(value.to_string()));
        }
        let confidence = Self { value };
        confidence
            .validate()
            .map_err(|_| DomainError::InvalidConfidence(value.to_string()))?;
        Ok(confidence)
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| DomainError::InvalidConfidence(trimmed.to_string()))?;
        Self::new(value)
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

// Whole numbers render without a fractional part ("50", not "50.0").
impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Name of an uploaded file whose extension is on the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFileName {
    value: String,
    extension: String,
}

impl ImageFileName {
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let (_, extension) = value.rsplit_once('.').ok_or(DomainError::InvalidFile)?;
        let extension = extension.to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DomainError::InvalidFile);
        }
        Ok(Self {
            value: value.to_string(),
            extension,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}
