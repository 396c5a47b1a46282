//! HTTP error handling and response conversion.
//!
//! Every failure of the relay ends up as an [`AppError`], and every variant
//! maps to exactly one status code:
//!
//! | variant | status |
//! |---|---|
//! | `Configuration`, `BadRequest`, `ValidationError` | 400 |
//! | `PayloadTooLarge` | 413 |
//! | `Upstream` | whatever the provider answered |
//! | `BadGateway` | 502 |
//! | `GatewayTimeout` | 504 |
//! | `Internal` | 500 |
//!
//! Bodies are always JSON with an `error` field; upstream errors add the raw
//! provider body as `details`.

use crate::{
    application::detect_objects::use_case::DetectError,
    domain::detection::errors::DomainError,
    infrastructure::{imaging::normalizer::ImagingError, providers::ProviderError},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Service is missing required configuration, e.g. the provider key (400).
    Configuration(String),

    /// Request could not be interpreted (400).
    BadRequest(String),

    /// Request was readable but a value failed validation (400).
    ValidationError(String),

    /// Request body exceeds the upload cap (413).
    PayloadTooLarge(String),

    /// Provider answered with a non-200 status; passed through as-is.
    Upstream {
        provider: &'static str,
        status: StatusCode,
        details: String,
    },

    /// Provider unreachable or answered garbage (502).
    BadGateway(String),

    /// Provider did not answer in time (504).
    GatewayTimeout(String),

    /// Unclassified internal error (500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            Self::Upstream {
                provider, status, ..
            } => write!(f, "{} API error: status {}", provider, status),
            Self::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            Self::GatewayTimeout(msg) => write!(f, "Gateway timeout: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) | Self::BadRequest(_) | Self::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream { status, .. } => *status,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the response body.
    fn user_message(&self) -> String {
        match self {
            Self::Configuration(msg)
            | Self::BadRequest(msg)
            | Self::ValidationError(msg)
            | Self::PayloadTooLarge(msg)
            | Self::BadGateway(msg)
            | Self::GatewayTimeout(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Upstream { provider, .. } => format!("{} API error", provider),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("error={}", self);
        } else {
            tracing::warn!("error={}", self);
        }

        let body = match &self {
            Self::Upstream { details, .. } => json!({
                "error": self.user_message(),
                "details": details,
            }),
            _ => json!({ "error": self.user_message() }),
        };

        (status, Json(body)).into_response()
    }
}

// === Domain Error Conversion ===

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidFile | DomainError::NoImage => AppError::BadRequest(err.to_string()),
            DomainError::InvalidModelId(_) | DomainError::InvalidConfidence(_) => {
                AppError::ValidationError(err.to_string())
            }
        }
    }
}

// === Provider Error Conversion ===

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured { .. } => AppError::Configuration(err.to_string()),
            ProviderError::Timeout { .. } => AppError::GatewayTimeout(err.to_string()),
            ProviderError::Transport { .. } | ProviderError::InvalidResponse { .. } => {
                AppError::BadGateway(err.to_string())
            }
            ProviderError::InvalidEndpoint { .. } => AppError::Internal(err.to_string()),
            ProviderError::Rejected {
                provider,
                status,
                body,
            } => AppError::Upstream {
                provider,
                status,
                details: body,
            },
        }
    }
}

// === Image Processing Error Conversion ===

impl From<ImagingError> for AppError {
    fn from(err: ImagingError) -> Self {
        match err {
            ImagingError::Base64(e) => {
                tracing::warn!(base64_decode_error = %e);
                AppError::BadRequest("Invalid image data".into())
            }
            ImagingError::Image(e) => AppError::from(e),
            ImagingError::Worker(msg) => {
                tracing::error!(image_worker_error = %msg);
                AppError::Internal(format!("Image processing failed: {}", msg))
            }
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(_) | image::ImageError::Decoding(_) => {
                tracing::warn!(image_decode_error = %err);
                AppError::BadRequest("Invalid image data".into())
            }
            image::ImageError::Limits(_) => {
                tracing::warn!(image_limits_error = %err);
                AppError::BadRequest("Image exceeds limits".into())
            }
            image::ImageError::IoError(_)
            | image::ImageError::Encoding(_)
            | image::ImageError::Parameter(_) => {
                tracing::error!(image_encode_error = %err);
                AppError::Internal(format!("Image encoding failed: {}", err))
            }
        }
    }
}

impl From<DetectError> for AppError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::Imaging(e) => e.into(),
            DetectError::Provider(e) => e.into(),
        }
    }
}

// === General Fallback Error Conversion ===

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(anyhow_error = %err, "Unclassified error with chain");
        err.chain().for_each(|cause| {
            tracing::error!(cause = %cause, "Error source");
        });
        AppError::Internal(err.to_string())
    }
}
