use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

pub mod alert_models;
pub mod camera_models;
pub mod detection_models;
pub mod image_models;
pub mod motion_models;

pub use alert_models::{Alert, AlertFields, AlertPayload};
pub use camera_models::{Camera, CameraFields, CameraPayload, CameraRow, Resolution};
pub use detection_models::{Detection, DetectionFields, DetectionPayload};
pub use image_models::{Image, ImageFields, ImagePayload};
pub use motion_models::{MotionEvent, MotionFields, MotionPayload};

/// Keeps an explicit `null` apart from an absent field.
///
/// Use together with `#[serde(default)]`: absent gives `None`, `null` gives
/// `Some(None)` and a value gives `Some(Some(v))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) const MAY_NOT_BE_NULL: &str = "This field may not be null.";

/// Optional field that may be left out but never set to `null`.
///
/// Use together with `#[serde(default)]`.
pub(crate) fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<T>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => Err(D::Error::custom(MAY_NOT_BE_NULL)),
    }
}
