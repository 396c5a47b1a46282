use crate::{domain::detection::value_objects::ALLOWED_EXTENSIONS, presentation::http::state::AppState};
use axum::{Json, extract::State};

pub async fn service_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let provider = &state.provider;
    let formats: Vec<String> = ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_ascii_uppercase())
        .collect();

    Json(serde_json::json!({
        "message": "Computer Vision API - Roboflow Integration",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Object detection API powered by Roboflow",
        "supported_providers": {
            (provider.name()): {
                "enabled": provider.is_configured(),
                "features": provider.features(),
            }
        },
        "endpoints": {
            "/": "API documentation",
            "/health": "Health check",
            "/detect": "Roboflow object detection",
            "/roboflow/detect": "Roboflow object detection (alias of /detect)"
        },
        "supported_formats": formats,
        "max_file_size": state.config.max_upload_label(),
    }))
}
