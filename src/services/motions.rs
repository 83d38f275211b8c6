use super::{validation, UpdateMode};
use crate::db::models::{Image, MotionEvent, MotionFields, MotionPayload};
use crate::db::store::{missing_reference_message, Stores};
use crate::error::{Error, ValidationErrors};
use anyhow::Result;
use log::info;

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("motion event with id {}", id))
}

#[derive(Clone)]
pub struct MotionService {
    stores: Stores,
}

impl MotionService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> Result<Vec<MotionEvent>> {
        self.stores.motions.list().await
    }

    pub async fn get(&self, id: i64) -> Result<MotionEvent> {
        self.stores
            .motions
            .get(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn create(&self, payload: MotionPayload) -> Result<MotionEvent> {
        let fields = self.validate(payload, None, true).await?;
        let event = self.stores.motions.insert(&fields).await?;
        info!("Recorded motion event {} for camera {}", event.id, event.camera_id);
        Ok(event)
    }

    /// `timestamp` and `created_at` are kept from the stored event.
    pub async fn update(
        &self,
        id: i64,
        payload: MotionPayload,
        mode: UpdateMode,
    ) -> Result<MotionEvent> {
        let current = self.get(id).await?;
        let fields = self
            .validate(payload, Some(&current), mode.requires_all())
            .await?;

        self.stores
            .motions
            .update(id, &fields)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.stores.motions.delete(id).await? {
            return Err(not_found(id).into());
        }
        info!("Deleted motion event {}", id);
        Ok(())
    }

    /// Images of a motion event; empty when the event does not exist.
    pub async fn images(&self, id: i64) -> Result<Vec<Image>> {
        self.stores.images.list_by_motion(id).await
    }

    async fn validate(
        &self,
        payload: MotionPayload,
        current: Option<&MotionEvent>,
        require: bool,
    ) -> Result<MotionFields> {
        let mut errors = ValidationErrors::default();

        let camera_id = validation::required(
            &mut errors,
            "camera",
            payload.camera,
            current.map(|m| m.camera_id),
            require,
        );
        if let Some(camera_id) = camera_id {
            if self.stores.cameras.get(camera_id).await?.is_none() {
                errors.add("camera", missing_reference_message(camera_id));
            }
        }

        let duration = validation::nullable(payload.duration, current.and_then(|m| m.duration));
        if let Some(duration) = duration {
            validation::number(&mut errors, "duration", duration, Some(0.0), None);
        }

        let threshold =
            validation::nullable(payload.threshold, current.and_then(|m| m.threshold));
        if let Some(threshold) = threshold {
            validation::number(&mut errors, "threshold", threshold, None, None);
        }

        errors.into_result()?;

        let Some(camera_id) = camera_id else {
            return Err(Error::Internal("motion event without camera".into()).into());
        };

        Ok(MotionFields {
            camera_id,
            duration,
            threshold,
        })
    }
}
