use super::{validation, UpdateMode};
use crate::db::models::{Image, ImageFields, ImagePayload};
use crate::db::store::{missing_reference_message, Stores};
use crate::error::{Error, ValidationErrors};
use anyhow::Result;
use log::info;

const FILEPATH_MAX_LEN: usize = 200;

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("image with id {}", id))
}

/// Captured images. The camera of an image is never written; it always
/// comes from the image's motion event.
#[derive(Clone)]
pub struct ImageService {
    stores: Stores,
}

impl ImageService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> Result<Vec<Image>> {
        self.stores.images.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Image> {
        self.stores
            .images
            .get(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn create(&self, payload: ImagePayload) -> Result<Image> {
        let fields = self.validate(payload, None, true).await?;
        let image = self.stores.images.insert(&fields).await?;
        info!("Stored image {} for motion event {}", image.id, image.motion_event_id);
        Ok(image)
    }

    pub async fn update(&self, id: i64, payload: ImagePayload, mode: UpdateMode) -> Result<Image> {
        let current = self.get(id).await?;
        let fields = self
            .validate(payload, Some(&current), mode.requires_all())
            .await?;

        self.stores
            .images
            .update(id, &fields)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.stores.images.delete(id).await? {
            return Err(not_found(id).into());
        }
        info!("Deleted image {}", id);
        Ok(())
    }

    async fn validate(
        &self,
        payload: ImagePayload,
        current: Option<&Image>,
        require: bool,
    ) -> Result<ImageFields> {
        let mut errors = ValidationErrors::default();

        let motion_event_id = validation::required(
            &mut errors,
            "motion_event",
            payload.motion_event,
            current.map(|i| i.motion_event_id),
            require,
        );
        if let Some(motion_event_id) = motion_event_id {
            if self.stores.motions.get(motion_event_id).await?.is_none() {
                errors.add("motion_event", missing_reference_message(motion_event_id));
            }
        }

        let filepath = validation::required(
            &mut errors,
            "filepath",
            payload.filepath,
            current.map(|i| i.filepath.clone()),
            require,
        );
        if let Some(filepath) = &filepath {
            validation::url(&mut errors, "filepath", filepath, FILEPATH_MAX_LEN);
        }

        let filesize = validation::nullable(payload.filesize, current.and_then(|i| i.filesize));
        if let Some(filesize) = filesize {
            validation::integer(&mut errors, "filesize", filesize, Some(0), None);
        }

        errors.into_result()?;

        let (Some(motion_event_id), Some(filepath)) = (motion_event_id, filepath) else {
            return Err(Error::Internal("image fields incomplete after validation".into()).into());
        };

        Ok(ImageFields {
            motion_event_id,
            filepath,
            filesize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{CameraPayload, MotionPayload};
    use crate::services::Services;

    async fn motion(services: &Services) -> (i64, i64) {
        let camera = services
            .cameras
            .create(CameraPayload {
                address: Some("http://cam.test/1".to_string()),
                resolution: Some("1280x720".to_string()),
                fps: Some(25),
                ..Default::default()
            })
            .await
            .unwrap();
        let event = services
            .motions
            .create(MotionPayload {
                camera: Some(camera.id),
                duration: Some(Some(5.5)),
                ..Default::default()
            })
            .await
            .unwrap();
        (camera.id, event.id)
    }

    #[tokio::test]
    async fn image_reports_camera_of_its_motion_event() {
        let services = Services::in_memory();
        let (camera_id, motion_id) = motion(&services).await;

        let image = services
            .images
            .create(ImagePayload {
                motion_event: Some(motion_id),
                filepath: Some("http://cam.test/img1.jpg".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let fetched = services.images.get(image.id).await.unwrap();
        assert_eq!(fetched.camera_id, camera_id);
        assert_eq!(fetched.motion_event_id, motion_id);
    }

    #[tokio::test]
    async fn filepath_must_be_url_and_filesize_non_negative() {
        let services = Services::in_memory();
        let (_, motion_id) = motion(&services).await;

        let err = services
            .images
            .create(ImagePayload {
                motion_event: Some(motion_id),
                filepath: Some("/var/media/img1.jpg".to_string()),
                filesize: Some(Some(-5)),
            })
            .await
            .unwrap_err();

        match err.downcast_ref::<Error>() {
            Some(Error::Validation(errors)) => {
                assert!(errors.has("filepath"));
                assert!(errors.has("filesize"));
                assert!(!errors.has("motion_event"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_motion_event_is_rejected() {
        let services = Services::in_memory();
        let err = services
            .images
            .create(ImagePayload {
                motion_event: Some(99),
                filepath: Some("http://cam.test/img1.jpg".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(e)) if e.has("motion_event")));
    }

    #[tokio::test]
    async fn delete_removes_detections_of_the_image() {
        let services = Services::in_memory();
        let (_, motion_id) = motion(&services).await;
        let image = services
            .images
            .create(ImagePayload {
                motion_event: Some(motion_id),
                filepath: Some("http://cam.test/img1.jpg".to_string()),
                filesize: Some(Some(2048)),
            })
            .await
            .unwrap();
        let detection = services
            .detections
            .create(crate::db::models::DetectionPayload {
                image: Some(Some(image.id)),
                object_class: Some("car".to_string()),
                confidence: Some(0.7),
                ..Default::default()
            })
            .await
            .unwrap();

        services.images.delete(image.id).await.unwrap();

        assert!(services.detections.get(detection.id).await.is_err());
        assert!(services.motions.get(motion_id).await.is_ok());
    }
}
