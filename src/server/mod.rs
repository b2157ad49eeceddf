//! Server module: the request pipeline and its HTTP binding
//!
//! A request flows through the axum adapter (`router`) into a `Dispatcher`
//! (error boundary), then the validation middleware, then a typed handler.

pub mod builder;
pub mod dispatcher;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use dispatcher::{Dispatcher, wrap_handler};
pub use handlers::{
    PaymentEndpoints, create_payment_endpoint, get_payment_endpoint, list_payments_endpoint,
};
pub use crate::core::{ApiResponse, RawRequest, RequestHandler};
pub use router::build_payment_routes;
