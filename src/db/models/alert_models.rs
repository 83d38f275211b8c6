use super::non_null;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification raised from a detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Alert {
    pub id: i64,
    #[serde(rename = "detection")]
    pub detection_id: i64,
    pub message: String,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertFields {
    pub detection_id: i64,
    pub message: String,
    pub delivered: bool,
}

impl From<&Alert> for AlertFields {
    fn from(alert: &Alert) -> Self {
        Self {
            detection_id: alert.detection_id,
            message: alert.message.clone(),
            delivered: alert.delivered,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertPayload {
    #[serde(default, deserialize_with = "non_null")]
    pub detection: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub delivered: Option<bool>,
}
