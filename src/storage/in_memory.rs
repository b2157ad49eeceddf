//! In-memory implementation of PaymentRepository for testing and development

use crate::core::{Payment, PaymentRepository};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory payment repository
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryPaymentRepository {
    payments: Arc<RwLock<HashMap<String, Payment>>>,
}

impl InMemoryPaymentRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payments
    pub fn len(&self) -> usize {
        self.payments.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn fetch_by_id(&self, payment_id: &str) -> Result<Option<Payment>> {
        let payments = self
            .payments
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let payment = payments.get(payment_id).cloned();
        tracing::debug!(payment_id = %payment_id, found = payment.is_some(), "Payment fetch result");
        Ok(payment)
    }

    async fn create(&self, payment: &Payment) -> Result<()> {
        let mut payments = self
            .payments
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        payments.insert(payment.payment_id.clone(), payment.clone());
        tracing::debug!(payment_id = %payment.payment_id, "Stored payment");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Payment>> {
        let payments = self
            .payments
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(payments.values().cloned().collect())
    }

    async fn list_by_currency(&self, currency: &str) -> Result<Vec<Payment>> {
        let normalized = currency.to_uppercase();
        let payments = self
            .payments
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let matching: Vec<Payment> = payments
            .values()
            .filter(|payment| payment.currency == normalized)
            .cloned()
            .collect();

        tracing::debug!(currency = %normalized, count = matching.len(), "Listed payments by currency");
        Ok(matching)
    }
}
