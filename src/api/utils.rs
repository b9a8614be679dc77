//! API utility functions
//!
//! Contains the request-body extractor used by the mutating handlers.

use crate::error::AppError;
use crate::state::Record;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    Form,
};
use serde_json::Value;

/// Request body interpreted as one record
///
/// - JSON content types must carry a JSON object.
/// - URL-encoded forms become string fields; a repeated key becomes an
///   array of strings.
/// - Anything else, or an empty body, yields an empty record.
#[derive(Debug)]
pub struct RecordBody(pub Record);

/// Body encodings understood by [`RecordBody`]
#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(request: &Request) -> BodyKind {
    let mime = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());

    match mime.as_deref() {
        Some("application/json") => BodyKind::Json,
        Some(mime) if mime.starts_with("application/") && mime.ends_with("+json") => {
            BodyKind::Json
        }
        Some("application/x-www-form-urlencoded") => BodyKind::Form,
        _ => BodyKind::Other,
    }
}

/// Parse a JSON body into a record
///
/// An empty body is an empty record.
pub fn parse_json_record(bytes: &[u8]) -> Result<Record, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Record::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(AppError::InvalidBody(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(AppError::InvalidBody(e.to_string())),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fold URL-encoded pairs into a record
pub fn form_record(pairs: Vec<(String, String)>) -> Record {
    let mut record = Record::new();
    for (key, value) in pairs {
        let value = Value::String(value);
        match record.get_mut(&key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                record.insert(key, value);
            }
        }
    }
    record
}

// The body limit surfaces as a 413 rejection; everything else is a bad body.
fn body_rejection(status: StatusCode, reason: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::InvalidBody(reason)
    }
}

#[async_trait]
impl<S> FromRequest<S> for RecordBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| body_rejection(e.status(), e.to_string()))?;
                parse_json_record(&bytes).map(RecordBody)
            }
            BodyKind::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| body_rejection(e.status(), e.to_string()))?;
                Ok(RecordBody(form_record(pairs)))
            }
            BodyKind::Other => Ok(RecordBody(Record::new())),
        }
    }
}
