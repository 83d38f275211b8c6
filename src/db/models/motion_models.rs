use super::{non_null, nullable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Motion event model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MotionEvent {
    pub id: i64,
    #[serde(rename = "camera")]
    pub camera_id: i64,
    pub timestamp: DateTime<Utc>,
    pub duration: Option<f64>,
    pub threshold: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionFields {
    pub camera_id: i64,
    pub duration: Option<f64>,
    pub threshold: Option<f64>,
}

impl From<&MotionEvent> for MotionFields {
    fn from(event: &MotionEvent) -> Self {
        Self {
            camera_id: event.camera_id,
            duration: event.duration,
            threshold: event.threshold,
        }
    }
}

/// Request body for motion events. `timestamp` and `created_at` are not
/// accepted from callers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MotionPayload {
    #[serde(default, deserialize_with = "non_null")]
    pub camera: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub duration: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub threshold: Option<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_tells_null_from_absent() {
        let payload: MotionPayload =
            serde_json::from_str(r#"{"duration": null, "timestamp": "2020-01-01T00:00:00Z"}"#)
                .unwrap();

        assert_eq!(payload.duration, Some(None));
        assert_eq!(payload.threshold, None);
        assert_eq!(payload.camera, None);
    }

    #[test]
    fn serializes_camera_reference_as_id() {
        let now = Utc::now();
        let event = MotionEvent {
            id: 3,
            camera_id: 9,
            timestamp: now,
            duration: Some(5.5),
            threshold: None,
            created_at: now,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["camera"], 9);
        assert!(value["threshold"].is_null());
        assert!(value.get("camera_id").is_none());
    }
}
