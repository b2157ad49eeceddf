//! Shared repository doubles for the integration suites.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use payments::core::{Payment, PaymentRepository};
use payments::storage::InMemoryPaymentRepository;
use std::sync::{Arc, Mutex};

/// One call observed by [`RecordingRepository`]
#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryCall {
    FetchById(String),
    Create(Payment),
    ListAll,
    ListByCurrency(String),
}

/// In-memory repository that records every call it receives
#[derive(Clone, Default)]
pub struct RecordingRepository {
    inner: InMemoryPaymentRepository,
    calls: Arc<Mutex<Vec<RepositoryCall>>>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn shared(&self) -> Arc<dyn PaymentRepository> {
        Arc::new(self.clone())
    }

    fn record(&self, call: RepositoryCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PaymentRepository for RecordingRepository {
    async fn fetch_by_id(&self, payment_id: &str) -> Result<Option<Payment>> {
        self.record(RepositoryCall::FetchById(payment_id.to_string()));
        self.inner.fetch_by_id(payment_id).await
    }

    async fn create(&self, payment: &Payment) -> Result<()> {
        self.record(RepositoryCall::Create(payment.clone()));
        self.inner.create(payment).await
    }

    async fn list_all(&self) -> Result<Vec<Payment>> {
        self.record(RepositoryCall::ListAll);
        self.inner.list_all().await
    }

    async fn list_by_currency(&self, currency: &str) -> Result<Vec<Payment>> {
        self.record(RepositoryCall::ListByCurrency(currency.to_string()));
        self.inner.list_by_currency(currency).await
    }
}

/// Repository whose every operation fails like an unreachable store
pub struct FailingRepository;

#[async_trait]
impl PaymentRepository for FailingRepository {
    async fn fetch_by_id(&self, _payment_id: &str) -> Result<Option<Payment>> {
        Err(anyhow!("connection refused"))
    }

    async fn create(&self, _payment: &Payment) -> Result<()> {
        Err(anyhow!("connection refused"))
    }

    async fn list_all(&self) -> Result<Vec<Payment>> {
        Err(anyhow!("connection refused"))
    }

    async fn list_by_currency(&self, _currency: &str) -> Result<Vec<Payment>> {
        Err(anyhow!("connection refused"))
    }
}
