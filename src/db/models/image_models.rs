use super::{non_null, nullable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Captured image.
///
/// `camera_id` has no backing column: it is read through the owning motion
/// event every time the image is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Image {
    pub id: i64,
    #[serde(rename = "camera")]
    pub camera_id: i64,
    #[serde(rename = "motion_event")]
    pub motion_event_id: i64,
    pub filepath: String,
    pub filesize: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFields {
    pub motion_event_id: i64,
    pub filepath: String,
    pub filesize: Option<i64>,
}

impl From<&Image> for ImageFields {
    fn from(image: &Image) -> Self {
        Self {
            motion_event_id: image.motion_event_id,
            filepath: image.filepath.clone(),
            filesize: image.filesize,
        }
    }
}

/// Request body for images. A `camera` key is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagePayload {
    #[serde(default, deserialize_with = "non_null")]
    pub motion_event: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub filepath: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub filesize: Option<Option<i64>>,
}
