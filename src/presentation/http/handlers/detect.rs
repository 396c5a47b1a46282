use crate::{
    application::detect_objects::use_case::DetectObjectsUseCase,
    domain::detection::entity::DetectionResult,
    presentation::http::{errors::AppError, extract::parse_detection_request, state::AppState},
};
use axum::{
    Json,
    extract::{Request, State},
};

pub async fn detect_objects(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<DetectionResult>, AppError> {
    let request = parse_detection_request(&state, req).await?;

    let use_case = DetectObjectsUseCase::new(state.provider.clone());
    let result = use_case.execute(request).await?;
    Ok(Json(result))
}
