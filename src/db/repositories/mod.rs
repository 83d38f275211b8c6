use crate::db::store::duplicate_address;
use crate::error::Error;

pub mod alerts;
pub mod cameras;
pub mod detections;
pub mod images;
pub mod motions;

#[cfg(test)]
mod tests;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Constraint names from the migrations and the payload field each guards.
const CONSTRAINT_FIELDS: &[(&str, &str)] = &[
    ("cameras_address_key", "address"),
    ("cameras_resolution_check", "resolution"),
    ("cameras_fps_check", "fps"),
    ("cameras_motion_sensitivity_check", "motion_sensitivity"),
    ("motion_events_camera_id_fkey", "camera"),
    ("motion_events_duration_check", "duration"),
    ("images_motion_event_id_fkey", "motion_event"),
    ("images_filesize_check", "filesize"),
    ("detections_motion_event_id_fkey", "motion_event"),
    ("detections_image_id_fkey", "image"),
    ("detections_confidence_check", "confidence"),
    ("alerts_detection_id_fkey", "detection"),
];

fn constraint_field(constraint: &str) -> Option<&'static str> {
    CONSTRAINT_FIELDS
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, field)| *field)
}

/// Turns constraint violations into validation errors and everything else
/// into `Error::Database`.
pub(crate) fn map_write_error(err: sqlx::Error, context: &str) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err {
        let code = db_err.code();
        let field = db_err.constraint().and_then(constraint_field);
        let mapped = match (code.as_deref(), field) {
            (Some(UNIQUE_VIOLATION), Some("address")) => Some(duplicate_address()),
            (Some(UNIQUE_VIOLATION), Some(field)) => {
                Some(Error::invalid(field, format!("{} must be unique.", field)))
            }
            (Some(FOREIGN_KEY_VIOLATION), Some(field)) => Some(Error::invalid(
                field,
                "Referenced object does not exist.",
            )),
            (Some(CHECK_VIOLATION), Some(field)) => {
                Some(Error::invalid(field, "Value is out of the allowed range."))
            }
            _ => None,
        };
        if let Some(mapped) = mapped {
            return mapped.into();
        }
    }

    Error::Database(format!("{}: {}", context, err)).into()
}
