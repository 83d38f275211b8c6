use crate::api::rest::extract::{JsonBody, RecordId};
use crate::api::rest::{ApiResult, AppState};
use crate::db::models::{Detection, DetectionPayload};
use crate::services::UpdateMode;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/detections", get(list_detections).post(create_detection))
        .route(
            "/api/detections/:id",
            get(get_detection)
                .put(update_detection)
                .patch(patch_detection)
                .delete(delete_detection),
        )
}

pub async fn list_detections(State(state): State<AppState>) -> ApiResult<Json<Vec<Detection>>> {
    Ok(Json(state.services.detections.list().await?))
}

pub async fn create_detection(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<DetectionPayload>,
) -> ApiResult<(StatusCode, Json<Detection>)> {
    let detection = state.services.detections.create(payload).await?;
    Ok((StatusCode::CREATED, Json(detection)))
}

pub async fn get_detection(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Detection>> {
    Ok(Json(state.services.detections.get(id).await?))
}

pub async fn update_detection(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<DetectionPayload>,
) -> ApiResult<Json<Detection>> {
    let detection = state
        .services
        .detections
        .update(id, payload, UpdateMode::Full)
        .await?;
    Ok(Json(detection))
}

pub async fn patch_detection(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<DetectionPayload>,
) -> ApiResult<Json<Detection>> {
    let detection = state
        .services
        .detections
        .update(id, payload, UpdateMode::Partial)
        .await?;
    Ok(Json(detection))
}

pub async fn delete_detection(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    state.services.detections.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
