use super::{constraint_field, map_write_error};
use crate::db::migrations::run_migrations;
use crate::db::models::{
    AlertFields, CameraFields, DetectionFields, ImageFields, MotionFields, Resolution,
};
use crate::db::store::Stores;
use crate::error::Error;
use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[test]
fn constraint_names_map_to_payload_fields() {
    assert_eq!(constraint_field("cameras_address_key"), Some("address"));
    assert_eq!(constraint_field("images_motion_event_id_fkey"), Some("motion_event"));
    assert_eq!(constraint_field("alerts_detection_id_fkey"), Some("detection"));
    assert_eq!(constraint_field("some_other_constraint"), None);
}

#[test]
fn non_database_errors_stay_database_errors() {
    let err = map_write_error(sqlx::Error::RowNotFound, "Failed to create camera");
    match err.downcast_ref::<Error>() {
        Some(Error::Database(message)) => assert!(message.starts_with("Failed to create camera")),
        other => panic!("unexpected error: {:?}", other),
    }
}

/// Connect to the database named by TEST_DATABASE_URL, if any.
async fn test_stores() -> Result<Option<Stores>> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            println!("Skipping PostgreSQL test. Set TEST_DATABASE_URL to run.");
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await?;
    run_migrations(&pool).await?;

    Ok(Some(Stores::postgres(Arc::new(pool))))
}

fn camera(address: &str) -> CameraFields {
    CameraFields {
        address: address.to_string(),
        resolution: Resolution::Hd720,
        fps: 25,
        motion_sensitivity: 0.25,
        status: "active".to_string(),
    }
}

fn unique_address(tag: &str) -> String {
    format!(
        "http://cam.test/{}/{}",
        tag,
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

#[tokio::test]
async fn test_duplicate_address_is_a_validation_error() -> Result<()> {
    let Some(stores) = test_stores().await? else {
        return Ok(());
    };

    let address = unique_address("dup");
    stores.cameras.insert(&camera(&address)).await?;

    let err = stores.cameras.insert(&camera(&address)).await.unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::Validation(errors)) => assert!(errors.has("address")),
        other => panic!("unexpected error: {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_camera_delete_cascades() -> Result<()> {
    let Some(stores) = test_stores().await? else {
        return Ok(());
    };

    let cam = stores.cameras.insert(&camera(&unique_address("cascade"))).await?;
    let motion = stores
        .motions
        .insert(&MotionFields {
            camera_id: cam.id,
            duration: Some(5.5),
            threshold: None,
        })
        .await?;
    let image = stores
        .images
        .insert(&ImageFields {
            motion_event_id: motion.id,
            filepath: "http://cam.test/img1.jpg".to_string(),
            filesize: Some(1024),
        })
        .await?;
    assert_eq!(image.camera_id, cam.id);

    let detection = stores
        .detections
        .insert(&DetectionFields {
            motion_event_id: Some(motion.id),
            image_id: Some(image.id),
            object_class: "person".to_string(),
            confidence: 0.9,
        })
        .await?;
    let alert = stores
        .alerts
        .insert(&AlertFields {
            detection_id: detection.id,
            message: "Detected person".to_string(),
            delivered: false,
        })
        .await?;

    assert!(stores.cameras.delete(cam.id).await?);

    assert!(stores.motions.get(motion.id).await?.is_none());
    assert!(stores.images.get(image.id).await?.is_none());
    assert!(stores.detections.get(detection.id).await?.is_none());
    assert!(stores.alerts.get(alert.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_motion_delete_cascades_to_motion_only_detections() -> Result<()> {
    let Some(stores) = test_stores().await? else {
        return Ok(());
    };

    let cam = stores.cameras.insert(&camera(&unique_address("motion"))).await?;
    let motion = stores
        .motions
        .insert(&MotionFields {
            camera_id: cam.id,
            duration: None,
            threshold: None,
        })
        .await?;
    let image = stores
        .images
        .insert(&ImageFields {
            motion_event_id: motion.id,
            filepath: "http://cam.test/img3.jpg".to_string(),
            filesize: None,
        })
        .await?;

    let mut detection_ids = Vec::new();
    let mut alert_ids = Vec::new();
    for (image_id, motion_event_id) in [(Some(image.id), None), (None, Some(motion.id))] {
        let detection = stores
            .detections
            .insert(&DetectionFields {
                motion_event_id,
                image_id,
                object_class: "car".to_string(),
                confidence: 0.7,
            })
            .await?;
        let alert = stores
            .alerts
            .insert(&AlertFields {
                detection_id: detection.id,
                message: "Detected car".to_string(),
                delivered: false,
            })
            .await?;
        detection_ids.push(detection.id);
        alert_ids.push(alert.id);
    }

    assert!(stores.motions.delete(motion.id).await?);

    assert!(stores.images.get(image.id).await?.is_none());
    for id in detection_ids {
        assert!(stores.detections.get(id).await?.is_none());
    }
    for id in alert_ids {
        assert!(stores.alerts.get(id).await?.is_none());
    }
    assert!(stores.cameras.get(cam.id).await?.is_some());

    stores.cameras.delete(cam.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_image_camera_follows_motion_event() -> Result<()> {
    let Some(stores) = test_stores().await? else {
        return Ok(());
    };

    let first = stores.cameras.insert(&camera(&unique_address("first"))).await?;
    let second = stores.cameras.insert(&camera(&unique_address("second"))).await?;
    let motion = stores
        .motions
        .insert(&MotionFields {
            camera_id: first.id,
            duration: None,
            threshold: None,
        })
        .await?;
    let image = stores
        .images
        .insert(&ImageFields {
            motion_event_id: motion.id,
            filepath: "http://cam.test/img2.jpg".to_string(),
            filesize: None,
        })
        .await?;

    stores
        .motions
        .update(
            motion.id,
            &MotionFields {
                camera_id: second.id,
                ..MotionFields::from(&motion)
            },
        )
        .await?;

    let reloaded = stores.images.get(image.id).await?.expect("image exists");
    assert_eq!(reloaded.camera_id, second.id);

    let by_camera = stores.images.list_by_camera(second.id).await?;
    assert_eq!(by_camera.iter().map(|i| i.id).collect::<Vec<_>>(), vec![image.id]);

    stores.cameras.delete(first.id).await?;
    stores.cameras.delete(second.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_missing_parent_is_a_validation_error() -> Result<()> {
    let Some(stores) = test_stores().await? else {
        return Ok(());
    };

    let err = stores
        .motions
        .insert(&MotionFields {
            camera_id: i64::MAX,
            duration: None,
            threshold: None,
        })
        .await
        .unwrap_err();

    match err.downcast_ref::<Error>() {
        Some(Error::Validation(errors)) => assert!(errors.has("camera")),
        other => panic!("unexpected error: {:?}", other),
    }

    Ok(())
}
