use super::non_null;
use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Supported capture resolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Hd720,
    Hd1080,
    Uhd4k,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::Hd720, Resolution::Hd1080, Resolution::Uhd4k];

    /// Stored and serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Hd720 => "1280x720",
            Resolution::Hd1080 => "1920x1080",
            Resolution::Uhd4k => "3840x2160",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Hd720 => "720p",
            Resolution::Hd1080 => "1080p",
            Resolution::Uhd4k => "4k",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.as_str() == value || r.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("\"{}\" is not a valid choice.", value))
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Camera model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: i64,
    pub address: String,
    pub resolution: Resolution,
    pub fps: i32,
    pub motion_sensitivity: f64,
    pub status: String,
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Row shape of the `cameras` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CameraRow {
    pub id: i64,
    pub address: String,
    pub resolution: String,
    pub fps: i32,
    pub motion_sensitivity: f64,
    pub status: String,
}

impl TryFrom<CameraRow> for Camera {
    type Error = Error;

    fn try_from(row: CameraRow) -> Result<Self, Self::Error> {
        let resolution = row.resolution.parse().map_err(|e| {
            Error::Database(format!("Camera {} has unreadable resolution: {}", row.id, e))
        })?;

        Ok(Camera {
            id: row.id,
            address: row.address,
            resolution,
            fps: row.fps,
            motion_sensitivity: row.motion_sensitivity,
            status: row.status,
        })
    }
}

/// Validated column values written on insert and update
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFields {
    pub address: String,
    pub resolution: Resolution,
    pub fps: i32,
    pub motion_sensitivity: f64,
    pub status: String,
}

impl CameraFields {
    pub const DEFAULT_FPS: i32 = 25;
    pub const DEFAULT_MOTION_SENSITIVITY: f64 = 0.25;
    pub const DEFAULT_STATUS: &'static str = "active";
}

impl From<&Camera> for CameraFields {
    fn from(camera: &Camera) -> Self {
        Self {
            address: camera.address.clone(),
            resolution: camera.resolution,
            fps: camera.fps,
            motion_sensitivity: camera.motion_sensitivity,
            status: camera.status.clone(),
        }
    }
}

/// Request body for create, full update and partial update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CameraPayload {
    #[serde(default, deserialize_with = "non_null")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub resolution: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub fps: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub motion_sensitivity: Option<f64>,
    #[serde(default, deserialize_with = "non_null")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_accepts_pixels_and_labels() {
        assert_eq!("1280x720".parse::<Resolution>().unwrap(), Resolution::Hd720);
        assert_eq!("1080p".parse::<Resolution>().unwrap(), Resolution::Hd1080);
        assert_eq!("4K".parse::<Resolution>().unwrap(), Resolution::Uhd4k);
        assert!("800x600".parse::<Resolution>().is_err());
    }

    #[test]
    fn camera_serializes_canonical_resolution() {
        let camera = Camera {
            id: 7,
            address: "http://192.168.1.100:8080/video".to_string(),
            resolution: Resolution::Uhd4k,
            fps: 30,
            motion_sensitivity: 0.25,
            status: "active".to_string(),
        };

        let value = serde_json::to_value(&camera).unwrap();
        assert_eq!(value["resolution"], "3840x2160");
        assert_eq!(camera.to_string(), "http://192.168.1.100:8080/video");

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 6);
    }

    #[test]
    fn row_with_unknown_resolution_is_a_database_error() {
        let row = CameraRow {
            id: 1,
            address: "http://cam.test/1".to_string(),
            resolution: "640x480".to_string(),
            fps: 25,
            motion_sensitivity: 0.25,
            status: "active".to_string(),
        };

        assert!(matches!(Camera::try_from(row), Err(Error::Database(_))));
    }
}
