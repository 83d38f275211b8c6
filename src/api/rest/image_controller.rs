use crate::api::rest::extract::{JsonBody, RecordId};
use crate::api::rest::{ApiResult, AppState};
use crate::db::models::{Image, ImagePayload};
use crate::services::UpdateMode;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

/// Create image controller router. The `camera` of an image is read-only
/// and ignored in request bodies.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/images", get(list_images).post(create_image))
        .route(
            "/api/images/:id",
            get(get_image)
                .put(update_image)
                .patch(patch_image)
                .delete(delete_image),
        )
}

pub async fn list_images(State(state): State<AppState>) -> ApiResult<Json<Vec<Image>>> {
    Ok(Json(state.services.images.list().await?))
}

pub async fn create_image(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ImagePayload>,
) -> ApiResult<(StatusCode, Json<Image>)> {
    let image = state.services.images.create(payload).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn get_image(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Image>> {
    Ok(Json(state.services.images.get(id).await?))
}

pub async fn update_image(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<ImagePayload>,
) -> ApiResult<Json<Image>> {
    let image = state
        .services
        .images
        .update(id, payload, UpdateMode::Full)
        .await?;
    Ok(Json(image))
}

pub async fn patch_image(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<ImagePayload>,
) -> ApiResult<Json<Image>> {
    let image = state
        .services
        .images
        .update(id, payload, UpdateMode::Partial)
        .await?;
    Ok(Json(image))
}

pub async fn delete_image(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    state.services.images.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
