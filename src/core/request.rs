//! Transport-agnostic request shape consumed by the pipeline

use crate::core::response::ApiResponse;
use anyhow::Result;
use async_trait::async_trait;
use axum::http::Method;
use std::collections::HashMap;

/// Inbound request as seen by the dispatcher
///
/// Routing happens outside the pipeline; by the time a `RawRequest` exists
/// the endpoint is already known. `body` holds the raw bytes as received and
/// is `None` when the request carried no body or an empty one; decoding is
/// left to the validation middleware.
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Vec<u8>>,
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
}

impl RawRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            path_params: HashMap::new(),
            query_params: HashMap::new(),
        }
    }

    /// Attach a body; an empty one counts as no body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        self.body = if body.is_empty() { None } else { Some(body) };
        self
    }

    pub fn with_path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(key.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

/// An entry point that turns a request into a response
///
/// Errors returned here are unhandled failures: the dispatcher maps them to
/// a generic 500.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: RawRequest) -> Result<ApiResponse>;
}
