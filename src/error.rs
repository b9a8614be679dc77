//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! Responses carry short fixed plain-text bodies; the underlying cause only
//! goes to the log.

use crate::state::PersistenceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The mutating operation whose save failed
///
/// Selects the message returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// `POST /data`
    Create,
    /// `PUT /data/:id`
    Update,
    /// `DELETE /data/:id`
    Delete,
}

impl WriteOp {
    fn message(self) -> &'static str {
        match self {
            WriteOp::Create => "Error writing to data file",
            WriteOp::Update => "Error updating data file",
            WriteOp::Delete => "Error deleting data file",
        }
    }
}

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// No record with the given id
    #[error("Record not found: {0}")]
    ItemNotFound(String),

    /// No route matches the request path and method
    #[error("Route not found")]
    RouteNotFound,

    /// Request body could not be turned into a record
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Request body exceeds the body size limit
    #[error("Request body too large")]
    PayloadTooLarge,

    /// The collection could not be loaded
    #[error("Storage error: {0}")]
    Storage(#[from] PersistenceError),

    /// The mutated collection could not be saved
    #[error("Failed to persist {op:?}: {source}")]
    WriteFailed {
        /// Operation that was persisting
        op: WriteOp,
        /// Underlying persistence error
        #[source]
        source: PersistenceError,
    },
}

impl AppError {
    /// Wrap a save failure for the given operation
    pub fn write(op: WriteOp, source: PersistenceError) -> Self {
        AppError::WriteFailed { op, source }
    }

    /// HTTP status and fixed body for this error
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "Item not found"),
            AppError::RouteNotFound => (StatusCode::NOT_FOUND, "404 Not Found"),
            AppError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "Invalid request body"),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large"),
            AppError::Storage(PersistenceError::Read { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error reading data file")
            }
            AppError::Storage(PersistenceError::Parse { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error parsing data file")
            }
            // Handlers wrap saves with `AppError::write`; a bare write error
            // does not know its operation.
            AppError::Storage(PersistenceError::Write { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error saving data file")
            }
            AppError::WriteFailed { op, .. } => (StatusCode::INTERNAL_SERVER_ERROR, op.message()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_error() -> PersistenceError {
        PersistenceError::Read {
            location: "data.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }
    }

    fn write_error() -> PersistenceError {
        PersistenceError::Write {
            location: "data.json".to_string(),
            reason: "disk full".to_string(),
        }
    }

    #[test]
    fn test_not_found_variants() {
        assert_eq!(
            AppError::ItemNotFound("7".into()).status_and_message(),
            (StatusCode::NOT_FOUND, "Item not found")
        );
        assert_eq!(
            AppError::RouteNotFound.status_and_message(),
            (StatusCode::NOT_FOUND, "404 Not Found")
        );
    }

    #[test]
    fn test_storage_errors_are_500() {
        assert_eq!(
            AppError::from(read_error()).status_and_message(),
            (StatusCode::INTERNAL_SERVER_ERROR, "Error reading data file")
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(PersistenceError::Parse {
            location: "data.json".to_string(),
            source: parse,
        });
        assert_eq!(
            err.status_and_message(),
            (StatusCode::INTERNAL_SERVER_ERROR, "Error parsing data file")
        );
    }

    #[test]
    fn test_write_messages_follow_operation() {
        let cases = [
            (WriteOp::Create, "Error writing to data file"),
            (WriteOp::Update, "Error updating data file"),
            (WriteOp::Delete, "Error deleting data file"),
        ];
        for (op, expected) in cases {
            let (status, message) = AppError::write(op, write_error()).status_and_message();
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, expected);
        }
    }

    #[test]
    fn test_untagged_write_error_does_not_borrow_an_operation() {
        let (status, message) = AppError::from(write_error()).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Error saving data file");
        assert_ne!(message, WriteOp::Create.message());
    }

    #[test]
    fn test_payload_too_large_is_413() {
        assert_eq!(
            AppError::PayloadTooLarge.status_and_message(),
            (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::InvalidBody("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
