//! In-memory storage backend.
//!
//! Non-persistent; everything is lost when the process exits. Used for
//! development (`database.backend = "memory"`) and for tests. All tables
//! sit behind a single lock so a write and its cascade are one step.

use super::{
    duplicate_address, missing_reference, AlertStore, CameraStore, DetectionStore, ImageStore,
    MotionStore,
};
use crate::db::models::{
    Alert, AlertFields, Camera, CameraFields, Detection, DetectionFields, Image, ImageFields,
    MotionEvent, MotionFields,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Image as kept in memory: the camera is looked up on every read.
#[derive(Debug, Clone)]
struct StoredImage {
    id: i64,
    motion_event_id: i64,
    filepath: String,
    filesize: Option<i64>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    cameras: BTreeMap<i64, Camera>,
    motions: BTreeMap<i64, MotionEvent>,
    images: BTreeMap<i64, StoredImage>,
    detections: BTreeMap<i64, Detection>,
    alerts: BTreeMap<i64, Alert>,
    last_camera_id: i64,
    last_motion_id: i64,
    last_image_id: i64,
    last_detection_id: i64,
    last_alert_id: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

impl Tables {
    fn address_taken(&self, address: &str, except: Option<i64>) -> bool {
        self.cameras
            .values()
            .any(|c| c.address == address && Some(c.id) != except)
    }

    fn image_view(&self, stored: &StoredImage) -> Option<Image> {
        let motion = self.motions.get(&stored.motion_event_id)?;
        Some(Image {
            id: stored.id,
            camera_id: motion.camera_id,
            motion_event_id: stored.motion_event_id,
            filepath: stored.filepath.clone(),
            filesize: stored.filesize,
            created_at: stored.created_at,
        })
    }

    fn images_where(&self, keep: impl Fn(&Image) -> bool) -> Vec<Image> {
        self.images
            .values()
            .filter_map(|stored| self.image_view(stored))
            .filter(|image| keep(image))
            .collect()
    }

    fn check_detection_refs(&self, fields: &DetectionFields) -> Result<()> {
        if let Some(id) = fields.motion_event_id {
            if !self.motions.contains_key(&id) {
                return Err(missing_reference("motion_event", id).into());
            }
        }
        if let Some(id) = fields.image_id {
            if !self.images.contains_key(&id) {
                return Err(missing_reference("image", id).into());
            }
        }
        Ok(())
    }

    fn delete_camera(&mut self, id: i64) -> bool {
        if self.cameras.remove(&id).is_none() {
            return false;
        }
        let motion_ids: Vec<i64> = self
            .motions
            .values()
            .filter(|m| m.camera_id == id)
            .map(|m| m.id)
            .collect();
        for motion_id in motion_ids {
            self.delete_motion(motion_id);
        }
        true
    }

    fn delete_motion(&mut self, id: i64) -> bool {
        if self.motions.remove(&id).is_none() {
            return false;
        }
        let image_ids: Vec<i64> = self
            .images
            .values()
            .filter(|i| i.motion_event_id == id)
            .map(|i| i.id)
            .collect();
        for image_id in image_ids {
            self.delete_image(image_id);
        }
        let detection_ids: Vec<i64> = self
            .detections
            .values()
            .filter(|d| d.motion_event_id == Some(id))
            .map(|d| d.id)
            .collect();
        for detection_id in detection_ids {
            self.delete_detection(detection_id);
        }
        true
    }

    fn delete_image(&mut self, id: i64) -> bool {
        if self.images.remove(&id).is_none() {
            return false;
        }
        let detection_ids: Vec<i64> = self
            .detections
            .values()
            .filter(|d| d.image_id == Some(id))
            .map(|d| d.id)
            .collect();
        for detection_id in detection_ids {
            self.delete_detection(detection_id);
        }
        true
    }

    fn delete_detection(&mut self, id: i64) -> bool {
        if self.detections.remove(&id).is_none() {
            return false;
        }
        self.alerts.retain(|_, alert| alert.detection_id != id);
        true
    }

    fn delete_alert(&mut self, id: i64) -> bool {
        self.alerts.remove(&id).is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CameraStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Camera>> {
        Ok(self.tables.read().await.cameras.values().cloned().collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.tables.read().await.cameras.len() as i64)
    }

    async fn get(&self, id: i64) -> Result<Option<Camera>> {
        Ok(self.tables.read().await.cameras.get(&id).cloned())
    }

    async fn get_by_address(&self, address: &str) -> Result<Option<Camera>> {
        let tables = self.tables.read().await;
        Ok(tables
            .cameras
            .values()
            .find(|c| c.address == address)
            .cloned())
    }

    async fn insert(&self, fields: &CameraFields) -> Result<Camera> {
        let mut tables = self.tables.write().await;
        if tables.address_taken(&fields.address, None) {
            return Err(duplicate_address().into());
        }

        let camera = Camera {
            id: next_id(&mut tables.last_camera_id),
            address: fields.address.clone(),
            resolution: fields.resolution,
            fps: fields.fps,
            motion_sensitivity: fields.motion_sensitivity,
            status: fields.status.clone(),
        };
        tables.cameras.insert(camera.id, camera.clone());
        Ok(camera)
    }

    async fn update(&self, id: i64, fields: &CameraFields) -> Result<Option<Camera>> {
        let mut tables = self.tables.write().await;
        if !tables.cameras.contains_key(&id) {
            return Ok(None);
        }
        if tables.address_taken(&fields.address, Some(id)) {
            return Err(duplicate_address().into());
        }

        let camera = Camera {
            id,
            address: fields.address.clone(),
            resolution: fields.resolution,
            fps: fields.fps,
            motion_sensitivity: fields.motion_sensitivity,
            status: fields.status.clone(),
        };
        tables.cameras.insert(id, camera.clone());
        Ok(Some(camera))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.delete_camera(id))
    }
}

#[async_trait]
impl MotionStore for MemoryStore {
    async fn list(&self) -> Result<Vec<MotionEvent>> {
        Ok(self.tables.read().await.motions.values().cloned().collect())
    }

    async fn list_by_camera(&self, camera_id: i64) -> Result<Vec<MotionEvent>> {
        let tables = self.tables.read().await;
        Ok(tables
            .motions
            .values()
            .filter(|m| m.camera_id == camera_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<MotionEvent>> {
        Ok(self.tables.read().await.motions.get(&id).cloned())
    }

    async fn insert(&self, fields: &MotionFields) -> Result<MotionEvent> {
        let mut tables = self.tables.write().await;
        if !tables.cameras.contains_key(&fields.camera_id) {
            return Err(missing_reference("camera", fields.camera_id).into());
        }

        let now = Utc::now();
        let event = MotionEvent {
            id: next_id(&mut tables.last_motion_id),
            camera_id: fields.camera_id,
            timestamp: now,
            duration: fields.duration,
            threshold: fields.threshold,
            created_at: now,
        };
        tables.motions.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(&self, id: i64, fields: &MotionFields) -> Result<Option<MotionEvent>> {
        let mut tables = self.tables.write().await;
        if !tables.cameras.contains_key(&fields.camera_id) {
            return Err(missing_reference("camera", fields.camera_id).into());
        }

        let Some(event) = tables.motions.get_mut(&id) else {
            return Ok(None);
        };
        event.camera_id = fields.camera_id;
        event.duration = fields.duration;
        event.threshold = fields.threshold;
        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.delete_motion(id))
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Image>> {
        Ok(self.tables.read().await.images_where(|_| true))
    }

    async fn list_by_camera(&self, camera_id: i64) -> Result<Vec<Image>> {
        Ok(self
            .tables
            .read()
            .await
            .images_where(|image| image.camera_id == camera_id))
    }

    async fn list_by_motion(&self, motion_event_id: i64) -> Result<Vec<Image>> {
        Ok(self
            .tables
            .read()
            .await
            .images_where(|image| image.motion_event_id == motion_event_id))
    }

    async fn get(&self, id: i64) -> Result<Option<Image>> {
        let tables = self.tables.read().await;
        Ok(tables
            .images
            .get(&id)
            .and_then(|stored| tables.image_view(stored)))
    }

    async fn insert(&self, fields: &ImageFields) -> Result<Image> {
        let mut tables = self.tables.write().await;
        if !tables.motions.contains_key(&fields.motion_event_id) {
            return Err(missing_reference("motion_event", fields.motion_event_id).into());
        }

        let stored = StoredImage {
            id: next_id(&mut tables.last_image_id),
            motion_event_id: fields.motion_event_id,
            filepath: fields.filepath.clone(),
            filesize: fields.filesize,
            created_at: Utc::now(),
        };
        tables.images.insert(stored.id, stored.clone());
        tables
            .image_view(&stored)
            .ok_or_else(|| missing_reference("motion_event", fields.motion_event_id).into())
    }

    async fn update(&self, id: i64, fields: &ImageFields) -> Result<Option<Image>> {
        let mut tables = self.tables.write().await;
        if !tables.motions.contains_key(&fields.motion_event_id) {
            return Err(missing_reference("motion_event", fields.motion_event_id).into());
        }

        let Some(stored) = tables.images.get_mut(&id) else {
            return Ok(None);
        };
        stored.motion_event_id = fields.motion_event_id;
        stored.filepath = fields.filepath.clone();
        stored.filesize = fields.filesize;
        let stored = stored.clone();
        Ok(tables.image_view(&stored))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.delete_image(id))
    }
}

#[async_trait]
impl DetectionStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Detection>> {
        Ok(self.tables.read().await.detections.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Detection>> {
        Ok(self.tables.read().await.detections.get(&id).cloned())
    }

    async fn insert(&self, fields: &DetectionFields) -> Result<Detection> {
        let mut tables = self.tables.write().await;
        tables.check_detection_refs(fields)?;

        let detection = Detection {
            id: next_id(&mut tables.last_detection_id),
            motion_event_id: fields.motion_event_id,
            image_id: fields.image_id,
            object_class: fields.object_class.clone(),
            confidence: fields.confidence,
            created_at: Utc::now(),
        };
        tables.detections.insert(detection.id, detection.clone());
        Ok(detection)
    }

    async fn update(&self, id: i64, fields: &DetectionFields) -> Result<Option<Detection>> {
        let mut tables = self.tables.write().await;
        tables.check_detection_refs(fields)?;

        let Some(detection) = tables.detections.get_mut(&id) else {
            return Ok(None);
        };
        detection.motion_event_id = fields.motion_event_id;
        detection.image_id = fields.image_id;
        detection.object_class = fields.object_class.clone();
        detection.confidence = fields.confidence;
        Ok(Some(detection.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.delete_detection(id))
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Alert>> {
        Ok(self.tables.read().await.alerts.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Alert>> {
        Ok(self.tables.read().await.alerts.get(&id).cloned())
    }

    async fn insert(&self, fields: &AlertFields) -> Result<Alert> {
        let mut tables = self.tables.write().await;
        if !tables.detections.contains_key(&fields.detection_id) {
            return Err(missing_reference("detection", fields.detection_id).into());
        }

        let alert = Alert {
            id: next_id(&mut tables.last_alert_id),
            detection_id: fields.detection_id,
            message: fields.message.clone(),
            delivered: fields.delivered,
            created_at: Utc::now(),
        };
        tables.alerts.insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn update(&self, id: i64, fields: &AlertFields) -> Result<Option<Alert>> {
        let mut tables = self.tables.write().await;
        if !tables.detections.contains_key(&fields.detection_id) {
            return Err(missing_reference("detection", fields.detection_id).into());
        }

        let Some(alert) = tables.alerts.get_mut(&id) else {
            return Ok(None);
        };
        alert.detection_id = fields.detection_id;
        alert.message = fields.message.clone();
        alert.delivered = fields.delivered;
        Ok(Some(alert.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.delete_alert(id))
    }
}
