//! Payment record and the normalized inputs that produce it

use serde::{Deserialize, Serialize, Serializer};

/// A stored payment
///
/// Payments are immutable: the service builds one at creation time with a
/// freshly generated identifier and nothing ever updates it afterwards.
/// `currency` is always upper-cased before it reaches this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Opaque UUID-formatted identifier
    pub payment_id: String,

    /// Strictly positive amount; whole values serialize as integers
    #[serde(serialize_with = "serialize_amount")]
    pub amount: f64,

    /// Upper-cased currency code
    pub currency: String,
}

/// Largest magnitude below which every whole `f64` is an exact integer
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Write `100.0` as `100` and keep fractional amounts as floats
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.fract() == 0.0 && amount.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

impl Payment {
    pub fn new(payment_id: impl Into<String>, input: CreatePaymentInput) -> Self {
        Self {
            payment_id: payment_id.into(),
            amount: input.amount,
            currency: input.currency,
        }
    }
}

/// Validated body of a create request
///
/// Produced by `CreatePaymentSchema`; `amount > 0` and `currency` is trimmed
/// and upper-cased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentInput {
    pub amount: f64,
    pub currency: String,
}

/// Optional currency constraint applied when listing payments
///
/// `None` is the explicit "no filter" value.
pub type CurrencyFilter = Option<String>;
