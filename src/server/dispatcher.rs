//! Top-level error boundary around every entry point
//!
//! Whatever escapes the wrapped handler (a storage error, a bug, a panic) is
//! logged with full detail and answered with a fixed 500 whose body never
//! contains the original error.

use crate::core::error::panic_message;
use crate::core::request::{RawRequest, RequestHandler};
use crate::core::response::ApiResponse;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Error boundary wrapping a [`RequestHandler`]
#[derive(Clone)]
pub struct Dispatcher {
    handler: Arc<dyn RequestHandler>,
}

impl Dispatcher {
    pub fn new(handler: impl RequestHandler + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Run the wrapped handler; never fails
    pub async fn dispatch(&self, request: RawRequest) -> ApiResponse {
        tracing::info!(
            method = %request.method,
            path = %request.path,
            query = ?request.query_params,
            has_body = request.has_body(),
            "Processing request"
        );

        let outcome = AssertUnwindSafe(self.handler.handle(request))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                tracing::error!(error = ?error, "Unhandled error in request handler");
                ApiResponse::internal_server_error()
            }
            Err(payload) => {
                tracing::error!(
                    panic = %panic_message(payload.as_ref()),
                    "Request handler panicked"
                );
                ApiResponse::internal_server_error()
            }
        }
    }
}

/// Wrap an entry point in the error boundary
pub fn wrap_handler(handler: impl RequestHandler + 'static) -> Dispatcher {
    Dispatcher::new(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::response::INTERNAL_ERROR_MESSAGE;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl RequestHandler for Echo {
        async fn handle(&self, request: RawRequest) -> Result<ApiResponse> {
            ApiResponse::ok(&json!({ "path": request.path }))
        }
    }

    struct Failing;

    #[async_trait]
    impl RequestHandler for Failing {
        async fn handle(&self, _request: RawRequest) -> Result<ApiResponse> {
            Err(anyhow!("connection refused: table Payments"))
        }
    }

    struct Panicking;

    #[async_trait]
    impl RequestHandler for Panicking {
        async fn handle(&self, _request: RawRequest) -> Result<ApiResponse> {
            panic!("boom");
        }
    }

    fn request() -> RawRequest {
        RawRequest::new(Method::GET, "/payments")
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let response = wrap_handler(Echo).dispatch(request()).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["path"], "/payments");
    }

    #[tokio::test]
    async fn test_error_becomes_generic_500() {
        let response = wrap_handler(Failing).dispatch(request()).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body,
            json!({"success": false, "message": INTERNAL_ERROR_MESSAGE})
        );
        assert!(!response.body.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_500() {
        let response = wrap_handler(Panicking).dispatch(request()).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body["message"], INTERNAL_ERROR_MESSAGE);
    }
}
