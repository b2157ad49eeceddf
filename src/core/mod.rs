//! Core module containing the payment model, the transport-agnostic
//! request/response shapes, the validation pipeline and the
//! service/repository seam

pub mod error;
pub mod payment;
pub mod repository;
pub mod request;
pub mod response;
pub mod service;
pub mod validation;

pub use error::{ParamLocation, ValidationFailure};
pub use payment::{CreatePaymentInput, CurrencyFilter, Payment};
pub use repository::PaymentRepository;
pub use request::{RawRequest, RequestHandler};
pub use response::ApiResponse;
pub use service::PaymentService;
