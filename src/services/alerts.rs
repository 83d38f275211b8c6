use super::{validation, UpdateMode};
use crate::db::models::{Alert, AlertFields, AlertPayload};
use crate::db::store::{missing_reference_message, Stores};
use crate::error::{Error, ValidationErrors};
use anyhow::Result;
use log::info;

const MESSAGE_MAX_LEN: usize = 255;

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("alert with id {}", id))
}

#[derive(Clone)]
pub struct AlertService {
    stores: Stores,
}

impl AlertService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> Result<Vec<Alert>> {
        self.stores.alerts.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Alert> {
        self.stores
            .alerts
            .get(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn create(&self, payload: AlertPayload) -> Result<Alert> {
        let fields = self.validate(payload, None, true).await?;
        let alert = self.stores.alerts.insert(&fields).await?;
        info!("Raised alert {} for detection {}", alert.id, alert.detection_id);
        Ok(alert)
    }

    /// `delivered` may be set either way at any time.
    pub async fn update(&self, id: i64, payload: AlertPayload, mode: UpdateMode) -> Result<Alert> {
        let current = self.get(id).await?;
        let fields = self
            .validate(payload, Some(&current), mode.requires_all())
            .await?;

        self.stores
            .alerts
            .update(id, &fields)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.stores.alerts.delete(id).await? {
            return Err(not_found(id).into());
        }
        info!("Deleted alert {}", id);
        Ok(())
    }

    async fn validate(
        &self,
        payload: AlertPayload,
        current: Option<&Alert>,
        require: bool,
    ) -> Result<AlertFields> {
        let mut errors = ValidationErrors::default();

        let detection_id = validation::required(
            &mut errors,
            "detection",
            payload.detection,
            current.map(|a| a.detection_id),
            require,
        );
        if let Some(id) = detection_id {
            if self.stores.detections.get(id).await?.is_none() {
                errors.add("detection", missing_reference_message(id));
            }
        }

        let message = validation::required(
            &mut errors,
            "message",
            payload.message,
            current.map(|a| a.message.clone()),
            require,
        );
        if let Some(message) = &message {
            validation::text(&mut errors, "message", message, MESSAGE_MAX_LEN);
        }

        let delivered = payload
            .delivered
            .or(current.map(|a| a.delivered))
            .unwrap_or(false);

        errors.into_result()?;

        let (Some(detection_id), Some(message)) = (detection_id, message) else {
            return Err(Error::Internal("alert fields incomplete after validation".into()).into());
        };

        Ok(AlertFields {
            detection_id,
            message,
            delivered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DetectionPayload;
    use crate::services::Services;

    async fn detection(services: &Services) -> i64 {
        services
            .detections
            .create(DetectionPayload {
                object_class: Some("dog".to_string()),
                confidence: Some(0.66),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn delivered_defaults_to_false_and_toggles() {
        let services = Services::in_memory();
        let detection_id = detection(&services).await;

        let alert = services
            .alerts
            .create(AlertPayload {
                detection: Some(detection_id),
                message: Some("Detected dog with confidence 0.66".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!alert.delivered);

        let delivered = services
            .alerts
            .update(
                alert.id,
                AlertPayload {
                    delivered: Some(true),
                    ..Default::default()
                },
                UpdateMode::Partial,
            )
            .await
            .unwrap();
        assert!(delivered.delivered);
        assert_eq!(delivered.message, alert.message);
        assert_eq!(delivered.created_at, alert.created_at);

        let undelivered = services
            .alerts
            .update(
                alert.id,
                AlertPayload {
                    delivered: Some(false),
                    ..Default::default()
                },
                UpdateMode::Partial,
            )
            .await
            .unwrap();
        assert!(!undelivered.delivered);
    }

    #[tokio::test]
    async fn message_is_bounded() {
        let services = Services::in_memory();
        let detection_id = detection(&services).await;

        let err = services
            .alerts
            .create(AlertPayload {
                detection: Some(detection_id),
                message: Some("x".repeat(256)),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(e)) if e.has("message")));
    }

    #[tokio::test]
    async fn detection_is_required_and_must_exist() {
        let services = Services::in_memory();

        let err = services
            .alerts
            .create(AlertPayload {
                message: Some("orphan".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(e)) if e.has("detection")));

        let err = services
            .alerts
            .create(AlertPayload {
                detection: Some(12),
                message: Some("orphan".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(e)) if e.has("detection")));
    }

    #[tokio::test]
    async fn deleting_detection_removes_its_alerts() {
        let services = Services::in_memory();
        let detection_id = detection(&services).await;
        let alert = services
            .alerts
            .create(AlertPayload {
                detection: Some(detection_id),
                message: Some("Detected dog".to_string()),
                delivered: Some(true),
            })
            .await
            .unwrap();

        services.detections.delete(detection_id).await.unwrap();

        assert!(matches!(
            services.alerts.get(alert.id).await.unwrap_err().downcast_ref::<Error>(),
            Some(Error::NotFound(_))
        ));
    }
}
