use crate::api::rest::extract::{JsonBody, RecordId};
use crate::api::rest::{ApiResult, AppState};
use crate::db::models::{Image, MotionEvent, MotionPayload};
use crate::services::UpdateMode;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

/// Create motion event controller router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/motions", get(list_motions).post(create_motion))
        .route(
            "/api/motions/:id",
            get(get_motion)
                .put(update_motion)
                .patch(patch_motion)
                .delete(delete_motion),
        )
        .route("/api/motions/:id/images", get(list_motion_images))
}

pub async fn list_motions(State(state): State<AppState>) -> ApiResult<Json<Vec<MotionEvent>>> {
    Ok(Json(state.services.motions.list().await?))
}

pub async fn create_motion(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<MotionPayload>,
) -> ApiResult<(StatusCode, Json<MotionEvent>)> {
    let event = state.services.motions.create(payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_motion(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<MotionEvent>> {
    Ok(Json(state.services.motions.get(id).await?))
}

pub async fn update_motion(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<MotionPayload>,
) -> ApiResult<Json<MotionEvent>> {
    let event = state
        .services
        .motions
        .update(id, payload, UpdateMode::Full)
        .await?;
    Ok(Json(event))
}

pub async fn patch_motion(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<MotionPayload>,
) -> ApiResult<Json<MotionEvent>> {
    let event = state
        .services
        .motions
        .update(id, payload, UpdateMode::Partial)
        .await?;
    Ok(Json(event))
}

pub async fn delete_motion(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    state.services.motions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_motion_images(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Vec<Image>>> {
    Ok(Json(state.services.motions.images(id).await?))
}
