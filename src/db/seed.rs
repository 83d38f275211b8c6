//! Example records for a fresh installation.

use crate::db::models::{AlertPayload, CameraPayload, DetectionPayload, ImagePayload, MotionPayload};
use crate::services::Services;
use anyhow::{Context, Result};
use tracing::info;

const EXAMPLE_CAMERAS: usize = 10;

const OBJECT_CLASSES: [&str; EXAMPLE_CAMERAS] = [
    "person",
    "car",
    "bicycle",
    "dog",
    "cat",
    "truck",
    "bus",
    "motorcycle",
    "backpack",
    "umbrella",
];

const RESOLUTIONS: [&str; 3] = ["1280x720", "1920x1080", "3840x2160"];

fn camera_address(index: usize) -> String {
    format!("http://example.com/cameras/{}", index + 1)
}

/// Creates ten cameras, each with one motion event, image, detection and
/// alert. Does nothing when the first example camera already exists.
///
/// Returns the number of cameras created.
pub async fn seed_example_data(services: &Services) -> Result<usize> {
    if services
        .cameras
        .find_by_address(&camera_address(0))
        .await?
        .is_some()
    {
        info!("Example data already present, skipping seed");
        return Ok(0);
    }

    for i in 0..EXAMPLE_CAMERAS {
        let step = i as f64;

        let camera = services
            .cameras
            .create(CameraPayload {
                address: Some(camera_address(i)),
                resolution: Some(RESOLUTIONS[i % RESOLUTIONS.len()].to_string()),
                fps: Some(25 + (i as i64 % 3) * 5),
                motion_sensitivity: Some(0.2 + 0.02 * step),
                status: Some(if i % 2 == 0 { "active" } else { "inactive" }.to_string()),
            })
            .await
            .with_context(|| format!("Failed to seed camera {}", i + 1))?;

        let motion = services
            .motions
            .create(MotionPayload {
                camera: Some(camera.id),
                duration: Some(Some(2.5 + 0.5 * step)),
                threshold: Some(Some(0.3 + 0.05 * step)),
            })
            .await
            .with_context(|| format!("Failed to seed motion event for camera {}", camera.id))?;

        let image = services
            .images
            .create(ImagePayload {
                motion_event: Some(motion.id),
                filepath: Some(format!("http://example.com/media/{}.jpg", i + 1)),
                filesize: Some(Some(150_000 + 2_500 * i as i64)),
            })
            .await
            .with_context(|| format!("Failed to seed image for motion event {}", motion.id))?;

        let object_class = OBJECT_CLASSES[i];
        let confidence = 0.55 + 0.03 * step;
        let detection = services
            .detections
            .create(DetectionPayload {
                motion_event: Some(Some(motion.id)),
                image: Some(Some(image.id)),
                object_class: Some(object_class.to_string()),
                confidence: Some(confidence),
            })
            .await
            .with_context(|| format!("Failed to seed detection for image {}", image.id))?;

        services
            .alerts
            .create(AlertPayload {
                detection: Some(detection.id),
                message: Some(format!(
                    "Detected {} with confidence {:.2}",
                    object_class, confidence
                )),
                delivered: Some(i % 2 == 0),
            })
            .await
            .with_context(|| format!("Failed to seed alert for detection {}", detection.id))?;
    }

    info!("Seeded {} example cameras", EXAMPLE_CAMERAS);
    Ok(EXAMPLE_CAMERAS)
}
