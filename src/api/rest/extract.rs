//! Extractors that reject with an [`ApiError`] body instead of plain text.

use super::ApiError;
use crate::error::{Error, ValidationErrors};
use async_trait::async_trait;
use axum::{
    body::HttpBody,
    extract::{FromRequest, FromRequestParts, Path},
    http::{request::Parts, Request, StatusCode},
    BoxError, Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// JSON request body.
///
/// Bodies that do not parse, or are not objects, are reported under
/// `non_field_errors`. Values of the wrong type or an illegal `null` are
/// reported under their own key.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| Error::invalid(NON_FIELD_ERRORS, rejection.body_text()))?;

        decode(value).map(Self).map_err(|errors| Error::Validation(errors).into())
    }
}

const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Payload fields are all optional, so a single-key object decodes unless
/// that key's value is bad. That pins each failure on its field.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ValidationErrors> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            let mut errors = ValidationErrors::default();
            errors.add(
                NON_FIELD_ERRORS,
                format!("Invalid data. Expected a dictionary, but got {}.", kind(&other)),
            );
            return Err(errors);
        }
    };

    let whole = match serde_json::from_value::<T>(Value::Object(map.clone())) {
        Ok(payload) => return Ok(payload),
        Err(e) => e,
    };

    let mut errors = ValidationErrors::default();
    for (key, field) in map {
        let single = Map::from_iter([(key.clone(), field)]);
        if let Err(e) = serde_json::from_value::<T>(Value::Object(single)) {
            errors.add(&key, e.to_string());
        }
    }
    if errors.is_empty() {
        errors.add(NON_FIELD_ERRORS, whole.to_string());
    }
    Err(errors)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Numeric `:id` path segment; anything else cannot name a record.
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

        raw.parse::<i64>().map(RecordId).map_err(|_| {
            Error::NotFound(format!("no record with id {}", raw)).into()
        })
    }
}
