//! Payment entry points
//!
//! Each entry point is a validated handler guarded by its validation
//! configuration and wrapped in the dispatcher's error boundary.

use crate::core::payment::CreatePaymentInput;
use crate::core::service::PaymentService;
use crate::core::validation::{
    CreatePaymentSchema, CurrencyFilterSchema, PaymentIdSchema, ValidatedHandler,
    ValidationConfig, ValidationContext, with_validation,
};
use crate::core::request::RawRequest;
use crate::core::response::{ApiResponse, PAYMENT_NOT_FOUND_MESSAGE};
use crate::server::dispatcher::{Dispatcher, wrap_handler};
use anyhow::{Result, anyhow};
use async_trait::async_trait;

/// `POST /payments`
pub struct CreatePaymentHandler {
    service: PaymentService,
}

#[async_trait]
impl ValidatedHandler for CreatePaymentHandler {
    async fn handle(&self, _request: &RawRequest, context: ValidationContext) -> Result<ApiResponse> {
        let input: CreatePaymentInput = context.body_as()?;
        let payment = self.service.create_payment(input).await?;
        ApiResponse::created(&payment)
    }
}

/// `GET /payments/{id}`
pub struct GetPaymentHandler {
    service: PaymentService,
}

#[async_trait]
impl ValidatedHandler for GetPaymentHandler {
    async fn handle(&self, _request: &RawRequest, context: ValidationContext) -> Result<ApiResponse> {
        let payment_id = context
            .path_param("id")
            .ok_or_else(|| anyhow!("path parameter 'id' was not validated"))?;

        match self.service.get_payment_by_id(payment_id).await? {
            Some(payment) => ApiResponse::ok(&payment),
            None => Ok(ApiResponse::not_found(PAYMENT_NOT_FOUND_MESSAGE)),
        }
    }
}

/// `GET /payments`
pub struct ListPaymentsHandler {
    service: PaymentService,
}

#[async_trait]
impl ValidatedHandler for ListPaymentsHandler {
    async fn handle(&self, _request: &RawRequest, context: ValidationContext) -> Result<ApiResponse> {
        let filter = context.query_param("currency").map(str::to_string);
        let payments = self.service.list_payments(filter).await?;
        ApiResponse::ok(&payments)
    }
}

pub fn create_payment_endpoint(service: PaymentService) -> Dispatcher {
    wrap_handler(with_validation(
        ValidationConfig::new().body(CreatePaymentSchema),
        CreatePaymentHandler { service },
    ))
}

pub fn get_payment_endpoint(service: PaymentService) -> Dispatcher {
    wrap_handler(with_validation(
        ValidationConfig::new().path_param("id", PaymentIdSchema),
        GetPaymentHandler { service },
    ))
}

pub fn list_payments_endpoint(service: PaymentService) -> Dispatcher {
    wrap_handler(with_validation(
        ValidationConfig::new().query_param("currency", CurrencyFilterSchema),
        ListPaymentsHandler { service },
    ))
}

/// The three payment entry points sharing one service
#[derive(Clone)]
pub struct PaymentEndpoints {
    pub create: Dispatcher,
    pub get: Dispatcher,
    pub list: Dispatcher,
}

impl PaymentEndpoints {
    pub fn new(service: PaymentService) -> Self {
        Self {
            create: create_payment_endpoint(service.clone()),
            get: get_payment_endpoint(service.clone()),
            list: list_payments_endpoint(service),
        }
    }
}
