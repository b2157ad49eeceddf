//! Response mapper: status code + JSON body for every outcome
//!
//! Body shapes are part of the public contract:
//! - success with data: `{"success": true, "data": ...}`
//! - created: the record's fields flattened next to `"success": true`
//! - failures: `{"success": false, "message": "..."}`

use crate::core::error::ValidationFailure;
use anyhow::{Result, anyhow};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};

/// Message sent for any unhandled failure; the real cause is only logged
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message sent when a payment lookup finds nothing
pub const PAYMENT_NOT_FOUND_MESSAGE: &str = "Payment not found";

/// A status code and its JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// 200 with `{success: true, data}`
    pub fn ok<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        let data = serde_json::to_value(data)?;
        Ok(Self::new(
            StatusCode::OK,
            json!({ "success": true, "data": data }),
        ))
    }

    /// 201 with the record's fields flattened next to `success: true`
    pub fn created<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        let Value::Object(fields) = serde_json::to_value(data)? else {
            return Err(anyhow!("created payload must serialize to a JSON object"));
        };

        let mut body = serde_json::Map::new();
        body.insert("success".to_string(), Value::Bool(true));
        body.extend(fields);
        Ok(Self::new(StatusCode::CREATED, Value::Object(body)))
    }

    /// Failure body `{success: false, message}` with the given status
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(
            status,
            json!({ "success": false, "message": message.into() }),
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::failure(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::failure(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal_server_error() -> Self {
        Self::failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }
}

impl From<&ValidationFailure> for ApiResponse {
    fn from(failure: &ValidationFailure) -> Self {
        Self::failure(failure.status_code(), failure.message())
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
