use super::{non_null, nullable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object detection found in an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Detection {
    pub id: i64,
    #[serde(rename = "motion_event")]
    pub motion_event_id: Option<i64>,
    #[serde(rename = "image")]
    pub image_id: Option<i64>,
    pub object_class: String,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.object_class, self.confidence)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionFields {
    pub motion_event_id: Option<i64>,
    pub image_id: Option<i64>,
    pub object_class: String,
    pub confidence: f64,
}

impl From<&Detection> for DetectionFields {
    fn from(detection: &Detection) -> Self {
        Self {
            motion_event_id: detection.motion_event_id,
            image_id: detection.image_id,
            object_class: detection.object_class.clone(),
            confidence: detection.confidence,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionPayload {
    #[serde(default, deserialize_with = "nullable")]
    pub motion_event: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Option<Option<i64>>,
    #[serde(default, deserialize_with = "non_null")]
    pub object_class: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_class_and_rounded_confidence() {
        let detection = Detection {
            id: 1,
            motion_event_id: None,
            image_id: Some(4),
            object_class: "person".to_string(),
            confidence: 0.876,
            created_at: Utc::now(),
        };

        assert_eq!(detection.to_string(), "person (0.88)");
    }
}
