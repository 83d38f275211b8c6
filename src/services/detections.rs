use super::{validation, UpdateMode};
use crate::db::models::{Detection, DetectionFields, DetectionPayload};
use crate::db::store::{missing_reference_message, Stores};
use crate::error::{Error, ValidationErrors};
use anyhow::Result;
use log::{debug, info};

const OBJECT_CLASS_MAX_LEN: usize = 100;

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("detection with id {}", id))
}

#[derive(Clone)]
pub struct DetectionService {
    stores: Stores,
}

impl DetectionService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> Result<Vec<Detection>> {
        self.stores.detections.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Detection> {
        self.stores
            .detections
            .get(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn create(&self, payload: DetectionPayload) -> Result<Detection> {
        let fields = self.validate(payload, None, true).await?;
        let detection = self.stores.detections.insert(&fields).await?;
        debug!("Stored detection {}: {}", detection.id, detection);
        Ok(detection)
    }

    pub async fn update(
        &self,
        id: i64,
        payload: DetectionPayload,
        mode: UpdateMode,
    ) -> Result<Detection> {
        let current = self.get(id).await?;
        let fields = self
            .validate(payload, Some(&current), mode.requires_all())
            .await?;

        self.stores
            .detections
            .update(id, &fields)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.stores.detections.delete(id).await? {
            return Err(not_found(id).into());
        }
        info!("Deleted detection {}", id);
        Ok(())
    }

    async fn validate(
        &self,
        payload: DetectionPayload,
        current: Option<&Detection>,
        require: bool,
    ) -> Result<DetectionFields> {
        let mut errors = ValidationErrors::default();

        let motion_event_id = validation::nullable(
            payload.motion_event,
            current.and_then(|d| d.motion_event_id),
        );
        if let Some(id) = motion_event_id {
            if self.stores.motions.get(id).await?.is_none() {
                errors.add("motion_event", missing_reference_message(id));
            }
        }

        let image_id = validation::nullable(payload.image, current.and_then(|d| d.image_id));
        if let Some(id) = image_id {
            if self.stores.images.get(id).await?.is_none() {
                errors.add("image", missing_reference_message(id));
            }
        }

        let object_class = validation::required(
            &mut errors,
            "object_class",
            payload.object_class,
            current.map(|d| d.object_class.clone()),
            require,
        );
        if let Some(object_class) = &object_class {
            validation::text(&mut errors, "object_class", object_class, OBJECT_CLASS_MAX_LEN);
        }

        let confidence = validation::required(
            &mut errors,
            "confidence",
            payload.confidence,
            current.map(|d| d.confidence),
            require,
        );
        if let Some(confidence) = confidence {
            validation::number(&mut errors, "confidence", confidence, Some(0.0), Some(1.0));
        }

        errors.into_result()?;

        let (Some(object_class), Some(confidence)) = (object_class, confidence) else {
            return Err(
                Error::Internal("detection fields incomplete after validation".into()).into(),
            );
        };

        Ok(DetectionFields {
            motion_event_id,
            image_id,
            object_class,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Services;

    fn detection(confidence: f64) -> DetectionPayload {
        DetectionPayload {
            object_class: Some("person".to_string()),
            confidence: Some(confidence),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn confidence_outside_unit_interval_is_rejected() {
        let services = Services::in_memory();

        for confidence in [1.5, -0.1] {
            let err = services.detections.create(detection(confidence)).await.unwrap_err();
            assert!(
                matches!(err.downcast_ref::<Error>(), Some(Error::Validation(e)) if e.has("confidence")),
                "{} accepted",
                confidence
            );
        }
        assert!(services.detections.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn boundary_confidences_are_accepted() {
        let services = Services::in_memory();

        let low = services.detections.create(detection(0.0)).await.unwrap();
        let high = services.detections.create(detection(1.0)).await.unwrap();

        assert_eq!(low.confidence, 0.0);
        assert_eq!(high.confidence, 1.0);
        assert_eq!(low.image_id, None);
        assert_eq!(low.motion_event_id, None);
    }

    #[tokio::test]
    async fn references_must_exist_when_given() {
        let services = Services::in_memory();
        let err = services
            .detections
            .create(DetectionPayload {
                motion_event: Some(Some(3)),
                image: Some(Some(4)),
                ..detection(0.5)
            })
            .await
            .unwrap_err();

        match err.downcast_ref::<Error>() {
            Some(Error::Validation(errors)) => {
                assert!(errors.has("motion_event"));
                assert!(errors.has("image"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn patch_confidence_keeps_created_at() {
        let services = Services::in_memory();
        let created = services.detections.create(detection(0.4)).await.unwrap();

        let updated = services
            .detections
            .update(
                created.id,
                DetectionPayload {
                    confidence: Some(0.8),
                    ..Default::default()
                },
                UpdateMode::Partial,
            )
            .await
            .unwrap();

        assert_eq!(updated.confidence, 0.8);
        assert_eq!(updated.object_class, "person");
        assert_eq!(updated.created_at, created.created_at);
    }
}
