use super::{
    handlers::{detect, health, info},
    middleware::{body_limit::payload_too_large_as_json, request_id::request_id_middleware},
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        // Info
        .route("/", get(info::service_info))
        // Health
        .route("/health", get(health::health_check))
        // Detection
        .route("/detect", post(detect::detect_objects))
        .route("/roboflow/detect", post(detect::detect_objects))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(middleware::map_response(payload_too_large_as_json))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
