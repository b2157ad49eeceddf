//! # Payments API
//!
//! A small record-keeping API for payment records (create, fetch by id,
//! list with an optional currency filter) built around a declarative request
//! validation pipeline.
//!
//! ## Features
//!
//! - **Declarative validation**: body, path and query schemas per endpoint
//! - **Fixed status mapping**: missing/malformed body and bad parameters are
//!   400, invalid body content is 422, unhandled failures are a generic 500
//! - **Pluggable storage**: in-memory or DynamoDB behind one repository trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use payments::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_repository(InMemoryPaymentRepository::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        CreatePaymentInput, CurrencyFilter, ParamLocation, Payment, PaymentRepository,
        PaymentService, ValidationFailure,
    };

    // === Validation ===
    pub use crate::core::validation::{
        AmountSchema, CreatePaymentSchema, CurrencyFilterSchema, CurrencySchema, PaymentIdSchema,
        Schema, SchemaError, SchemaResult, ValidatedHandler, ValidationConfig, ValidationContext,
        with_validation,
    };

    // === Server ===
    pub use crate::server::{
        ApiResponse, Dispatcher, PaymentEndpoints, RawRequest, RequestHandler, ServerBuilder,
        wrap_handler,
    };

    // === Storage ===
    pub use crate::storage::InMemoryPaymentRepository;
    #[cfg(feature = "dynamodb")]
    pub use crate::storage::DynamoDBPaymentRepository;

    // === Config ===
    pub use crate::config::{AppConfig, StorageBackend};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
