use crate::config::ApiConfig;
use crate::db::DatabaseService;
use crate::error::{Error, ValidationErrors};
use crate::services::Services;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::info;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod alert_controller;
pub mod camera_controller;
pub mod detection_controller;
pub mod extract;
pub mod image_controller;
pub mod motion_controller;


// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Present when records live in PostgreSQL
    pub database: Option<Arc<DatabaseService>>,
}

impl AppState {
    pub fn new(services: Services, database: Option<Arc<DatabaseService>>) -> Self {
        Self { services, database }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: status.as_u16(),
            errors: None,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(ref errors) => ApiError {
                message: err.to_string(),
                status: StatusCode::BAD_REQUEST.as_u16(),
                errors: Some(errors.clone()),
            },
            Error::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            Error::Database(_) | Error::Internal(_) => {
                log::error!("Request failed: {}", err);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(err) = err.downcast_ref::<Error>() {
            return err.clone().into();
        }

        log::error!("Request failed: {:#}", err);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

/// Implement IntoResponse for ApiError
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub cameras: i64,
}

async fn health(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<HealthResponse>)> {
    let (backend, healthy) = match &state.database {
        Some(database) => ("postgres", database.health_check().await?),
        None => ("memory", true),
    };

    if !healthy {
        return Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
                backend,
                cameras: 0,
            }),
        ));
    }

    let cameras = state.services.cameras.count().await?;
    Ok((
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            backend,
            cameras,
        }),
    ))
}

/// Every `/api` route, bound to the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(camera_controller::create_router())
        .merge(motion_controller::create_router())
        .merge(image_controller::create_router())
        .merge(detection_controller::create_router())
        .merge(alert_controller::create_router())
        .with_state(state)
}

pub struct RestApi {
    config: ApiConfig,
    state: AppState,
}

impl RestApi {
    pub fn new(config: &ApiConfig, state: AppState) -> Self {
        Self {
            config: config.clone(),
            state,
        }
    }

    /// Serve until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        // Create a CORS layer that allows all origins and preflight requests
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(false)
            .max_age(Duration::from_secs(3600));

        let app = router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        info!("API server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;

        axum::Server::from_tcp(listener.into_std()?)?
            .serve(app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
