//! Storage-access interface for payments

use crate::core::payment::Payment;
use anyhow::Result;
use async_trait::async_trait;

/// Repository trait for payment records
///
/// Implementations are injected into the service at construction. Storage
/// failures are returned as-is; implementations never retry or translate
/// them.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Fetch a payment by identifier; `Ok(None)` when it does not exist
    async fn fetch_by_id(&self, payment_id: &str) -> Result<Option<Payment>>;

    /// Store a payment
    ///
    /// Overwrites any record that already has the same identifier: there is
    /// no existence check and no optimistic concurrency.
    async fn create(&self, payment: &Payment) -> Result<()>;

    /// List every payment, in no particular order
    async fn list_all(&self) -> Result<Vec<Payment>>;

    /// List payments whose stored currency equals `currency`
    ///
    /// `currency` is upper-cased before comparison.
    async fn list_by_currency(&self, currency: &str) -> Result<Vec<Payment>>;
}
