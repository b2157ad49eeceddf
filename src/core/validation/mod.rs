//! Validation and normalization of request inputs
//!
//! This module provides a declarative approach to validating the body, path
//! parameters and query parameters of a request before it reaches a handler.
//! Schemas are pure; the middleware owns the mapping to HTTP statuses.

pub mod middleware;
pub mod schema;
pub mod schemas;

pub use middleware::{
    ValidatedHandler, ValidationConfig, ValidationContext, WithValidation, with_validation,
};
pub use schema::{DynSchema, Schema, SchemaCheckError, SchemaError, SchemaResult};
pub use schemas::{
    AmountSchema, CreatePaymentSchema, CurrencyFilterSchema, CurrencySchema, PaymentIdSchema,
};
