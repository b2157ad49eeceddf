//! Declarative request validation in front of a handler
//!
//! A [`ValidationConfig`] names which parts of the request to check and with
//! which schema. [`WithValidation`] runs those checks in a fixed order and
//! short-circuits on the first failure:
//!
//! 1. body configured and absent -> `MissingBody` (400)
//! 2. body configured and not UTF-8 JSON -> `MalformedBody` (400)
//! 3. body rejected by its schema -> `BodyValidationFailed` (422)
//! 4. each configured path parameter, in declaration order -> `ParamValidationFailed` (400)
//! 5. each configured query parameter, in declaration order -> `ParamValidationFailed` (400)
//!
//! Only when every check passes is the wrapped handler invoked, with a
//! [`ValidationContext`] holding the normalized values.

use super::schema::{DynSchema, SchemaCheckError};
use crate::core::error::{ParamLocation, ValidationFailure, panic_message};
use crate::core::request::{RawRequest, RequestHandler};
use crate::core::response::ApiResponse;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Which inputs of a request are validated, and by which schema
#[derive(Clone, Default)]
pub struct ValidationConfig {
    body: Option<Arc<dyn DynSchema>>,
    path_params: IndexMap<String, Arc<dyn DynSchema>>,
    query_params: IndexMap<String, Arc<dyn DynSchema>>,
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the JSON body with `schema`
    pub fn body(mut self, schema: impl DynSchema + 'static) -> Self {
        self.body = Some(Arc::new(schema));
        self
    }

    /// Validate path parameter `key` with `schema`
    pub fn path_param(mut self, key: impl Into<String>, schema: impl DynSchema + 'static) -> Self {
        self.path_params.insert(key.into(), Arc::new(schema));
        self
    }

    /// Validate query parameter `key` with `schema`
    pub fn query_param(mut self, key: impl Into<String>, schema: impl DynSchema + 'static) -> Self {
        self.query_params.insert(key.into(), Arc::new(schema));
        self
    }

    /// Run every configured check against `request`
    pub fn evaluate(&self, request: &RawRequest) -> Result<ValidationContext, ValidationFailure> {
        let mut context = ValidationContext::default();

        if let Some(schema) = &self.body {
            let raw = request
                .body
                .as_deref()
                .filter(|body| !body.is_empty())
                .ok_or(ValidationFailure::MissingBody)?;

            let parsed: Value =
                serde_json::from_slice(raw).map_err(|e| ValidationFailure::MalformedBody {
                    reason: e.to_string(),
                })?;

            let normalized = schema.check(Some(&parsed)).map_err(|err| match err {
                SchemaCheckError::Invalid(errors) => {
                    ValidationFailure::BodyValidationFailed { errors }
                }
                other => ValidationFailure::Unexpected {
                    reason: other.to_string(),
                },
            })?;
            context.body = Some(normalized);
        }

        context.path_params =
            check_params(ParamLocation::Path, &self.path_params, &request.path_params)?;
        context.query_params =
            check_params(ParamLocation::Query, &self.query_params, &request.query_params)?;

        Ok(context)
    }
}

fn check_params(
    location: ParamLocation,
    schemas: &IndexMap<String, Arc<dyn DynSchema>>,
    raw_params: &HashMap<String, String>,
) -> Result<HashMap<String, Value>, ValidationFailure> {
    let mut normalized = HashMap::with_capacity(schemas.len());

    for (key, schema) in schemas {
        let raw = raw_params.get(key).map(|v| Value::String(v.clone()));
        let value = schema.check(raw.as_ref()).map_err(|err| match err {
            SchemaCheckError::Invalid(errors) => ValidationFailure::ParamValidationFailed {
                location,
                key: key.clone(),
                errors,
            },
            other => ValidationFailure::Unexpected {
                reason: other.to_string(),
            },
        })?;
        normalized.insert(key.clone(), value);
    }

    Ok(normalized)
}

/// Normalized request inputs handed to a validated handler
///
/// Built once per request by the middleware and dropped with the response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationContext {
    pub body: Option<Value>,
    pub path_params: HashMap<String, Value>,
    pub query_params: HashMap<String, Value>,
}

impl ValidationContext {
    /// Deserialize the validated body into its typed form
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| anyhow!("request body was not validated"))?;
        Ok(serde_json::from_value(body)?)
    }

    /// A validated path parameter as a string
    pub fn path_param(&self, key: &str) -> Option<&str> {
        self.path_params.get(key).and_then(Value::as_str)
    }

    /// A validated query parameter as a string; `None` for "no value"
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params.get(key).and_then(Value::as_str)
    }
}

/// A handler that only ever sees validated input
#[async_trait]
pub trait ValidatedHandler: Send + Sync {
    async fn handle(&self, request: &RawRequest, context: ValidationContext)
    -> Result<ApiResponse>;
}

/// A handler guarded by a validation configuration
pub struct WithValidation<H> {
    config: ValidationConfig,
    handler: H,
}

impl<H> WithValidation<H> {
    /// Evaluate the checks, turning a panic inside a schema into `Unexpected`
    pub fn validate(&self, request: &RawRequest) -> Result<ValidationContext, ValidationFailure> {
        match catch_unwind(AssertUnwindSafe(|| self.config.evaluate(request))) {
            Ok(outcome) => outcome,
            Err(payload) => Err(ValidationFailure::Unexpected {
                reason: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn log_rejection(request: &RawRequest, failure: &ValidationFailure) {
    match failure {
        ValidationFailure::MissingBody => {
            tracing::warn!(path = %request.path, "Request body is missing");
        }
        ValidationFailure::MalformedBody { reason } => {
            tracing::error!(path = %request.path, reason = %reason, "JSON parsing failed");
        }
        ValidationFailure::BodyValidationFailed { errors } => {
            tracing::warn!(path = %request.path, errors = ?errors.messages(), "Body validation failed");
        }
        ValidationFailure::ParamValidationFailed {
            location,
            key,
            errors,
        } => {
            tracing::warn!(
                path = %request.path,
                location = %location,
                param = %key,
                errors = ?errors.messages(),
                "Parameter validation failed"
            );
        }
        ValidationFailure::Unexpected { reason } => {
            tracing::error!(path = %request.path, reason = %reason, "Validation middleware error");
        }
    }
}

#[async_trait]
impl<H: ValidatedHandler> RequestHandler for WithValidation<H> {
    async fn handle(&self, request: RawRequest) -> Result<ApiResponse> {
        let context = match self.validate(&request) {
            Ok(context) => context,
            Err(failure) => {
                log_rejection(&request, &failure);
                return Ok(ApiResponse::from(&failure));
            }
        };

        self.handler.handle(&request, context).await
    }
}

/// Guard `handler` with `config`
pub fn with_validation<H: ValidatedHandler>(config: ValidationConfig, handler: H) -> WithValidation<H> {
    WithValidation { config, handler }
}
