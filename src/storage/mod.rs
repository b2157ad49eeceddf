//! Storage implementations for different backends

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod in_memory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::{DynamoDBPaymentRepository, build_client};
pub use in_memory::InMemoryPaymentRepository;
