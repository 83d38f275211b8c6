//! Storage traits for the five record stores.
//!
//! Every backend must apply each write together with its cascade as one
//! atomic step, enforce `cameras.address` uniqueness, and reject references
//! to missing parents. Services validate before writing, but a backend may
//! still be raced, so its own checks are authoritative.

use crate::db::models::{
    Alert, AlertFields, Camera, CameraFields, Detection, DetectionFields, Image, ImageFields,
    MotionEvent, MotionFields,
};
use crate::db::repositories::{
    alerts::AlertsRepository, cameras::CamerasRepository, detections::DetectionsRepository,
    images::ImagesRepository, motions::MotionsRepository,
};
use crate::error::Error;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

pub mod memory;

pub use memory::MemoryStore;

#[async_trait]
pub trait CameraStore: Send + Sync + 'static {
    /// All cameras ordered by id
    async fn list(&self) -> Result<Vec<Camera>>;

    async fn count(&self) -> Result<i64>;

    async fn get(&self, id: i64) -> Result<Option<Camera>>;

    async fn get_by_address(&self, address: &str) -> Result<Option<Camera>>;

    async fn insert(&self, fields: &CameraFields) -> Result<Camera>;

    /// Returns `Ok(None)` when no camera has this id.
    async fn update(&self, id: i64, fields: &CameraFields) -> Result<Option<Camera>>;

    /// Deletes the camera with its motion events, images, detections and
    /// alerts. Returns `false` if it did not exist.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait MotionStore: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<MotionEvent>>;

    async fn list_by_camera(&self, camera_id: i64) -> Result<Vec<MotionEvent>>;

    async fn get(&self, id: i64) -> Result<Option<MotionEvent>>;

    /// `timestamp` and `created_at` are assigned here.
    async fn insert(&self, fields: &MotionFields) -> Result<MotionEvent>;

    async fn update(&self, id: i64, fields: &MotionFields) -> Result<Option<MotionEvent>>;

    /// Cascades to images and to detections referencing the event.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Images are always returned with `camera_id` read through their motion
/// event.
#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Image>>;

    async fn list_by_camera(&self, camera_id: i64) -> Result<Vec<Image>>;

    async fn list_by_motion(&self, motion_event_id: i64) -> Result<Vec<Image>>;

    async fn get(&self, id: i64) -> Result<Option<Image>>;

    async fn insert(&self, fields: &ImageFields) -> Result<Image>;

    async fn update(&self, id: i64, fields: &ImageFields) -> Result<Option<Image>>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait DetectionStore: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Detection>>;

    async fn get(&self, id: i64) -> Result<Option<Detection>>;

    async fn insert(&self, fields: &DetectionFields) -> Result<Detection>;

    async fn update(&self, id: i64, fields: &DetectionFields) -> Result<Option<Detection>>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait AlertStore: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Alert>>;

    async fn get(&self, id: i64) -> Result<Option<Alert>>;

    async fn insert(&self, fields: &AlertFields) -> Result<Alert>;

    async fn update(&self, id: i64, fields: &AlertFields) -> Result<Option<Alert>>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

/// One handle per store, all backed by the same storage.
#[derive(Clone)]
pub struct Stores {
    pub cameras: Arc<dyn CameraStore>,
    pub motions: Arc<dyn MotionStore>,
    pub images: Arc<dyn ImageStore>,
    pub detections: Arc<dyn DetectionStore>,
    pub alerts: Arc<dyn AlertStore>,
}

impl Stores {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            cameras: Arc::new(CamerasRepository::new(Arc::clone(&pool))),
            motions: Arc::new(MotionsRepository::new(Arc::clone(&pool))),
            images: Arc::new(ImagesRepository::new(Arc::clone(&pool))),
            detections: Arc::new(DetectionsRepository::new(Arc::clone(&pool))),
            alerts: Arc::new(AlertsRepository::new(pool)),
        }
    }

    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            cameras: store.clone(),
            motions: store.clone(),
            images: store.clone(),
            detections: store.clone(),
            alerts: store,
        }
    }
}

pub(crate) const DUPLICATE_ADDRESS: &str = "camera with this address already exists.";

pub(crate) fn duplicate_address() -> Error {
    Error::invalid("address", DUPLICATE_ADDRESS)
}

pub(crate) fn missing_reference_message(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

pub(crate) fn missing_reference(field: &str, id: i64) -> Error {
    Error::invalid(field, missing_reference_message(id))
}
