//! Field checks shared by the record services.
//!
//! Each check records its messages in a [`ValidationErrors`] instead of
//! returning early, so one response can report every bad field.

use crate::error::ValidationErrors;
use url::Url;

pub(crate) const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const INVALID_URL: &str = "Enter a valid URL.";
const INVALID_NUMBER: &str = "A valid number is required.";

const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// Picks the supplied value, or the current one when the payload left it
/// out. Records a "required" error when neither is acceptable.
pub(crate) fn required<T>(
    errors: &mut ValidationErrors,
    field: &str,
    supplied: Option<T>,
    current: Option<T>,
    require: bool,
) -> Option<T> {
    match supplied {
        Some(value) => Some(value),
        None if require || current.is_none() => {
            errors.add(field, REQUIRED);
            None
        }
        None => current,
    }
}

/// Absent keeps `current`, explicit `null` clears.
pub(crate) fn nullable<T>(supplied: Option<Option<T>>, current: Option<T>) -> Option<T> {
    match supplied {
        Some(value) => value,
        None => current,
    }
}

/// Non-empty text of at most `max_len` characters.
pub(crate) fn text(errors: &mut ValidationErrors, field: &str, value: &str, max_len: usize) -> bool {
    if value.trim().is_empty() {
        errors.add(field, BLANK);
        return false;
    }
    max_length(errors, field, value, max_len)
}

fn max_length(errors: &mut ValidationErrors, field: &str, value: &str, max_len: usize) -> bool {
    if value.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max_len),
        );
        return false;
    }
    true
}

/// Absolute http(s) or ftp(s) URL with a host.
pub(crate) fn url(errors: &mut ValidationErrors, field: &str, value: &str, max_len: usize) -> bool {
    if !text(errors, field, value, max_len) {
        return false;
    }

    let valid = match Url::parse(value) {
        Ok(parsed) => {
            URL_SCHEMES.contains(&parsed.scheme())
                && parsed.host_str().map_or(false, |host| !host.is_empty())
        }
        Err(_) => false,
    };

    if !valid {
        errors.add(field, INVALID_URL);
    }
    valid
}

/// Finite number within `[min, max]` (either bound optional).
pub(crate) fn number(
    errors: &mut ValidationErrors,
    field: &str,
    value: f64,
    min: Option<f64>,
    max: Option<f64>,
) -> bool {
    if !value.is_finite() {
        errors.add(field, INVALID_NUMBER);
        return false;
    }
    in_range(errors, field, value, min, max)
}

/// Integer within `[min, max]` (either bound optional).
pub(crate) fn integer(
    errors: &mut ValidationErrors,
    field: &str,
    value: i64,
    min: Option<i64>,
    max: Option<i64>,
) -> bool {
    in_range(errors, field, value, min, max)
}

fn in_range<T>(
    errors: &mut ValidationErrors,
    field: &str,
    value: T,
    min: Option<T>,
    max: Option<T>,
) -> bool
where
    T: PartialOrd + std::fmt::Display,
{
    if let Some(min) = min {
        if value < min {
            errors.add(
                field,
                format!("Ensure this value is greater than or equal to {}.", min),
            );
            return false;
        }
    }
    if let Some(max) = max {
        if value > max {
            errors.add(
                field,
                format!("Ensure this value is less than or equal to {}.", max),
            );
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_web_and_ftp_urls() {
        let mut errors = ValidationErrors::default();
        assert!(url(&mut errors, "address", "http://cam.test/1", 200));
        assert!(url(&mut errors, "address", "https://10.0.0.5:8443/stream", 200));
        assert!(url(&mut errors, "filepath", "ftp://files.test/img.jpg", 200));
        assert!(errors.is_empty());
    }

    #[test]
    fn rejects_non_urls() {
        for value in ["not a url", "rtsp://cam.test/1", "file:///tmp/a.jpg", "http://"] {
            let mut errors = ValidationErrors::default();
            assert!(!url(&mut errors, "address", value, 200), "{} accepted", value);
            assert_eq!(errors.get("address"), Some(&[INVALID_URL.to_string()][..]));
        }
    }

    #[test]
    fn blank_and_long_text_are_rejected() {
        let mut errors = ValidationErrors::default();
        assert!(!text(&mut errors, "status", "  ", 20));
        assert!(!text(&mut errors, "message", &"x".repeat(256), 255));
        assert_eq!(errors.get("status"), Some(&[BLANK.to_string()][..]));
        assert_eq!(
            errors.get("message"),
            Some(&["Ensure this field has no more than 255 characters.".to_string()][..])
        );
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let mut errors = ValidationErrors::default();
        assert!(number(&mut errors, "confidence", 0.0, Some(0.0), Some(1.0)));
        assert!(number(&mut errors, "confidence", 1.0, Some(0.0), Some(1.0)));
        assert!(errors.is_empty());

        assert!(!number(&mut errors, "confidence", 1.5, Some(0.0), Some(1.0)));
        assert!(!number(&mut errors, "duration", f64::NAN, Some(0.0), None));
        assert!(!integer(&mut errors, "fps", 0, Some(1), None));
        assert_eq!(
            errors.get("fps"),
            Some(&["Ensure this value is greater than or equal to 1.".to_string()][..])
        );
    }

    #[test]
    fn required_falls_back_to_current_only_when_allowed() {
        let mut errors = ValidationErrors::default();
        assert_eq!(required(&mut errors, "a", None, Some(3), false), Some(3));
        assert_eq!(required(&mut errors, "b", Some(4), Some(3), true), Some(4));
        assert_eq!(required::<i32>(&mut errors, "c", None, Some(3), true), None);
        assert_eq!(required::<i32>(&mut errors, "d", None, None, false), None);
        assert!(errors.has("c"));
        assert!(errors.has("d"));
        assert!(!errors.has("a"));
    }

    #[test]
    fn nullable_keeps_clears_or_replaces() {
        assert_eq!(nullable(None, Some(1.0)), Some(1.0));
        assert_eq!(nullable(Some(None), Some(1.0)), None);
        assert_eq!(nullable(Some(Some(2.0)), None), Some(2.0));
    }
}
