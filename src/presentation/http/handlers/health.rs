use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Map, Value, json};

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut configured = Map::new();
    configured.insert(
        state.provider.name().to_string(),
        Value::Bool(state.provider.is_configured()),
    );

    Json(json!({
        "status": "healthy",
        "api_keys_configured": configured,
    }))
}
