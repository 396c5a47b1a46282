//! Request parsing for the detect endpoint.
//!
//! [`parse_detection_request`] accepts either a multipart upload (`file`,
//! `model_id`, `confidence`) or a JSON body (`image`, `model_id`,
//! `confidence`) and turns it into a validated [`DetectionRequest`]. The
//! credential check runs before the body is touched so an unconfigured
//! service never reads uploads.

use crate::{
    application::detect_objects::dto::DetectionRequest,
    config::Config,
    domain::detection::{
        entity::ImageSource,
        errors::DomainError,
        value_objects::{Confidence, ImageFileName, ModelId},
    },
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde::Deserialize;

const INVALID_INPUT: &str = "Invalid input";

/// Confidence as sent by the caller: JSON number or text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConfidenceInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct DetectJsonBody {
    pub image: Option<String>,
    pub model_id: Option<String>,
    pub confidence: Option<ConfidenceInput>,
}

#[derive(Debug, Default)]
struct RawDetection {
    image: Option<ImageSource>,
    model_id: Option<String>,
    confidence: Option<ConfidenceInput>,
}

impl RawDetection {
    fn resolve(self, config: &Config) -> Result<DetectionRequest, DomainError> {
        let image = self.image.ok_or(DomainError::NoImage)?;

        let model_id = ModelId::new(
            self.model_id
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| config.default_model_id.clone()),
        )?;

        let confidence = match self.confidence {
            Some(ConfidenceInput::Number(value)) => Confidence::new(value)?,
            Some(ConfidenceInput::Text(text)) if !text.trim().is_empty() => {
                Confidence::parse(&text)?
            }
            _ => Confidence::new(config.default_confidence)?,
        };

        Ok(DetectionRequest {
            image,
            model_id,
            confidence,
        })
    }
}

pub async fn parse_detection_request(
    state: &AppState,
    req: Request,
) -> Result<DetectionRequest, AppError> {
    if !state.provider.is_configured() {
        return Err(AppError::Configuration(format!(
            "{} API key not configured",
            state.provider.display_name()
        )));
    }

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let raw = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|_| AppError::BadRequest(INVALID_INPUT.into()))?;
        read_multipart(multipart).await?
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<DetectJsonBody>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge("File too large".into()),
                _ => AppError::BadRequest(INVALID_INPUT.into()),
            })?;
        read_json(body)?
    } else {
        return Err(AppError::BadRequest(INVALID_INPUT.into()));
    };

    Ok(raw.resolve(&state.config)?)
}

fn multipart_error(err: MultipartError) -> AppError {
    match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge("File too large".into()),
        _ => AppError::BadRequest(INVALID_INPUT.into()),
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<RawDetection, AppError> {
    let mut raw = RawDetection::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "file" => {
                let file_name = ImageFileName::new(field.file_name().unwrap_or(""))?;
                let bytes = field.bytes().await.map_err(multipart_error)?;
                raw.image = Some(ImageSource::uploaded(file_name, bytes));
            }
            "model_id" => raw.model_id = Some(field.text().await.map_err(multipart_error)?),
            "confidence" => {
                raw.confidence = Some(ConfidenceInput::Text(
                    field.text().await.map_err(multipart_error)?,
                ))
            }
            _ => {}
        }
    }

    Ok(raw)
}

fn read_json(body: DetectJsonBody) -> Result<RawDetection, DomainError> {
    let image = match body.image.as_deref() {
        Some(data) => Some(ImageSource::inline(data)?),
        None => None,
    };

    Ok(RawDetection {
        image,
        model_id: body.model_id,
        confidence: body.confidence,
    })
}
