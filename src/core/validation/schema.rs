//! Schema abstraction: a pure validator/normalizer over one raw value
//!
//! A schema never throws. It returns a tagged result: either the normalized
//! value or the list of human-readable failure messages. Schemas know nothing
//! about HTTP; the middleware decides which status a failure maps to.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Failure messages produced by a schema
///
/// Displays as the messages joined with `", "`, which is exactly what gets
/// surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join(", "))]
pub struct SchemaError {
    messages: Vec<String>,
}

impl SchemaError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

/// Tagged outcome of a schema
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A named validation rule over one raw value
///
/// `raw` is `None` when the value is absent (missing field, missing path
/// segment, missing query key).
pub trait Schema: Send + Sync {
    /// Normalized output type
    type Output: Serialize;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Validate and normalize a raw value
    fn validate(&self, raw: Option<&Value>) -> SchemaResult<Self::Output>;
}

/// Why an erased schema could not produce a JSON value
#[derive(Debug, Error)]
pub enum SchemaCheckError {
    /// The schema rejected the value
    #[error(transparent)]
    Invalid(#[from] SchemaError),

    /// The normalized output could not be represented as JSON
    #[error("failed to encode output of schema '{schema}': {source}")]
    Encoding {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Object-safe view of a [`Schema`], used to store heterogeneous schemas in
/// one validation configuration
pub trait DynSchema: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, raw: Option<&Value>) -> Result<Value, SchemaCheckError>;
}

impl<S: Schema> DynSchema for S {
    fn name(&self) -> &'static str {
        Schema::name(self)
    }

    fn check(&self, raw: Option<&Value>) -> Result<Value, SchemaCheckError> {
        let output = self.validate(raw)?;
        serde_json::to_value(output).map_err(|source| SchemaCheckError::Encoding {
            schema: Schema::name(self),
            source,
        })
    }
}
