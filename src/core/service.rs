//! Payment service: identifier generation and create/get/list orchestration

use crate::core::payment::{CreatePaymentInput, CurrencyFilter, Payment};
use crate::core::repository::PaymentRepository;
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Business operations on payments
///
/// Owns record construction; persistence is delegated to the injected
/// repository.
#[derive(Clone)]
pub struct PaymentService {
    repository: Arc<dyn PaymentRepository>,
}

impl PaymentService {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    /// Create a payment from already-normalized input
    ///
    /// The identifier is a fresh random v4 UUID. Collisions are not checked.
    pub async fn create_payment(&self, input: CreatePaymentInput) -> Result<Payment> {
        let payment = Payment::new(Uuid::new_v4().to_string(), input);

        tracing::info!(
            payment_id = %payment.payment_id,
            amount = payment.amount,
            currency = %payment.currency,
            "Creating new payment"
        );

        self.repository.create(&payment).await?;

        tracing::info!(payment_id = %payment.payment_id, "Payment created successfully");
        Ok(payment)
    }

    /// Get a payment; `Ok(None)` when none exists
    pub async fn get_payment_by_id(&self, payment_id: &str) -> Result<Option<Payment>> {
        tracing::info!(payment_id = %payment_id, "Retrieving payment");

        let payment = self.repository.fetch_by_id(payment_id).await?;

        match &payment {
            Some(_) => tracing::info!(payment_id = %payment_id, "Payment retrieved successfully"),
            None => tracing::info!(payment_id = %payment_id, "Payment not found"),
        }
        Ok(payment)
    }

    /// List payments, optionally restricted to one currency
    pub async fn list_payments(&self, filter: CurrencyFilter) -> Result<Vec<Payment>> {
        match filter {
            None => {
                tracing::info!("Listing all payments");
                self.repository.list_all().await
            }
            Some(currency) => {
                tracing::info!(currency = %currency, "Listing payments with currency filter");
                self.repository.list_by_currency(&currency).await
            }
        }
    }
}
