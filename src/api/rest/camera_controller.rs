use crate::api::rest::extract::{JsonBody, RecordId};
use crate::api::rest::{ApiResult, AppState};
use crate::db::models::{Camera, CameraPayload, Image, MotionEvent};
use crate::services::UpdateMode;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

/// Create camera controller router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/cameras", get(list_cameras).post(create_camera))
        .route(
            "/api/cameras/:id",
            get(get_camera)
                .put(update_camera)
                .patch(patch_camera)
                .delete(delete_camera),
        )
        .route("/api/cameras/:id/motions", get(list_camera_motions))
        .route("/api/cameras/:id/images", get(list_camera_images))
}

pub async fn list_cameras(State(state): State<AppState>) -> ApiResult<Json<Vec<Camera>>> {
    Ok(Json(state.services.cameras.list().await?))
}

pub async fn create_camera(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CameraPayload>,
) -> ApiResult<(StatusCode, Json<Camera>)> {
    let camera = state.services.cameras.create(payload).await?;
    Ok((StatusCode::CREATED, Json(camera)))
}

pub async fn get_camera(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Camera>> {
    Ok(Json(state.services.cameras.get(id).await?))
}

pub async fn update_camera(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<CameraPayload>,
) -> ApiResult<Json<Camera>> {
    let camera = state
        .services
        .cameras
        .update(id, payload, UpdateMode::Full)
        .await?;
    Ok(Json(camera))
}

pub async fn patch_camera(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<CameraPayload>,
) -> ApiResult<Json<Camera>> {
    let camera = state
        .services
        .cameras
        .update(id, payload, UpdateMode::Partial)
        .await?;
    Ok(Json(camera))
}

/// Delete a camera and everything recorded from it
pub async fn delete_camera(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    state.services.cameras.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_camera_motions(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Vec<MotionEvent>>> {
    Ok(Json(state.services.cameras.motions(id).await?))
}

pub async fn list_camera_images(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Vec<Image>>> {
    Ok(Json(state.services.cameras.images(id).await?))
}
