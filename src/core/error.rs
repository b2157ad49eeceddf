//! Typed errors for the request validation pipeline
//!
//! Validation failures are resolved entirely inside the validation
//! middleware: each variant carries its own HTTP status and the message that
//! is surfaced to the caller. Storage and handler failures are *not* part of
//! this taxonomy; they travel as `anyhow::Error` up to the dispatcher, which
//! turns them into a detail-free 500.
//!
//! | Variant                  | Status |
//! |--------------------------|--------|
//! | `MissingBody`            | 400    |
//! | `MalformedBody`          | 400    |
//! | `BodyValidationFailed`   | 422    |
//! | `ParamValidationFailed`  | 400    |
//! | `Unexpected`             | 400    |

use crate::core::validation::SchemaError;
use axum::http::StatusCode;
use std::any::Any;
use std::fmt;
use thiserror::Error;

/// Message returned for an absent or unparseable body
pub const INVALID_BODY_MESSAGE: &str = "Valid request body is required";

/// Message returned when check evaluation fails for a non-schema reason
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation error";

/// Where a request parameter was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamLocation::Path => write!(f, "path"),
            ParamLocation::Query => write!(f, "query"),
        }
    }
}

/// A request rejected before it reached its handler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationFailure {
    /// A body schema is configured but the request has no body
    #[error("Valid request body is required")]
    MissingBody,

    /// The body is present but is not valid JSON
    #[error("Valid request body is required")]
    MalformedBody { reason: String },

    /// The parsed body was rejected by the body schema
    #[error("{errors}")]
    BodyValidationFailed { errors: SchemaError },

    /// A path or query parameter was rejected by its schema
    #[error("{errors}")]
    ParamValidationFailed {
        location: ParamLocation,
        key: String,
        errors: SchemaError,
    },

    /// Evaluating the checks failed for a reason unrelated to any schema
    #[error("Validation error")]
    Unexpected { reason: String },
}

impl ValidationFailure {
    /// Get the HTTP status code for this failure
    ///
    /// Body content failures are 422; everything else is 400.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationFailure::MissingBody => StatusCode::BAD_REQUEST,
            ValidationFailure::MalformedBody { .. } => StatusCode::BAD_REQUEST,
            ValidationFailure::BodyValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationFailure::ParamValidationFailed { .. } => StatusCode::BAD_REQUEST,
            ValidationFailure::Unexpected { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this failure, used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationFailure::MissingBody => "MISSING_BODY",
            ValidationFailure::MalformedBody { .. } => "MALFORMED_BODY",
            ValidationFailure::BodyValidationFailed { .. } => "BODY_VALIDATION_FAILED",
            ValidationFailure::ParamValidationFailed { .. } => "PARAM_VALIDATION_FAILED",
            ValidationFailure::Unexpected { .. } => "VALIDATION_ERROR",
        }
    }

    /// Message surfaced to the caller
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
