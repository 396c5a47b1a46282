use crate::presentation::http::errors::AppError;
use axum::{
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};

/// Rewrites the plain-text 413 emitted by `RequestBodyLimitLayer` for an
/// oversized `Content-Length` into the JSON error body every other failure
/// uses. 413s already produced by handlers pass through untouched.
pub async fn payload_too_large_as_json(response: Response) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
        response
    } else {
        AppError::PayloadTooLarge("File too large".into()).into_response()
    }
}
