use crate::api::rest::extract::{JsonBody, RecordId};
use crate::api::rest::{ApiResult, AppState};
use crate::db::models::{Alert, AlertPayload};
use crate::services::UpdateMode;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/alerts", get(list_alerts).post(create_alert))
        .route(
            "/api/alerts/:id",
            get(get_alert)
                .put(update_alert)
                .patch(patch_alert)
                .delete(delete_alert),
        )
}

pub async fn list_alerts(State(state): State<AppState>) -> ApiResult<Json<Vec<Alert>>> {
    Ok(Json(state.services.alerts.list().await?))
}

pub async fn create_alert(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<AlertPayload>,
) -> ApiResult<(StatusCode, Json<Alert>)> {
    let alert = state.services.alerts.create(payload).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn get_alert(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Alert>> {
    Ok(Json(state.services.alerts.get(id).await?))
}

pub async fn update_alert(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<AlertPayload>,
) -> ApiResult<Json<Alert>> {
    let alert = state
        .services
        .alerts
        .update(id, payload, UpdateMode::Full)
        .await?;
    Ok(Json(alert))
}

/// Typically used to flip `delivered`
pub async fn patch_alert(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<AlertPayload>,
) -> ApiResult<Json<Alert>> {
    let alert = state
        .services
        .alerts
        .update(id, payload, UpdateMode::Partial)
        .await?;
    Ok(Json(alert))
}

pub async fn delete_alert(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    state.services.alerts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
