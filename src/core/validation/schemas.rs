//! Payment schemas
//!
//! Each schema reproduces a fixed set of acceptance rules and failure
//! messages. Clients match on these messages, so they must not drift.

use super::schema::{Schema, SchemaError, SchemaResult};
use crate::core::payment::{CreatePaymentInput, CurrencyFilter};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub const AMOUNT_REQUIRED: &str = "Amount is required";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive number";
pub const CURRENCY_REQUIRED: &str = "Currency is required";
pub const CURRENCY_EMPTY: &str = "Currency must be a non-empty string";
pub const PAYMENT_OBJECT_REQUIRED: &str = "Valid payment object is required";
pub const PAYMENT_ID_REQUIRED: &str = "Payment ID is required";
pub const PAYMENT_ID_EMPTY: &str = "Payment ID cannot be empty";
pub const PAYMENT_ID_NOT_UUID: &str = "Payment ID must be a valid UUID format";
pub const CURRENCY_FILTER_NOT_STRING: &str = "Currency filter must be a string";

/// Allowed keys of a create-payment body, in validation order
const CREATE_PAYMENT_KEYS: [&str; 2] = ["amount", "currency"];

/// Leading-prefix float parse
///
/// Leading whitespace is skipped and the longest numeric prefix is parsed, so
/// `"12abc"` yields `12.0` and `"abc"` yields `None`. Only ASCII digits count.
fn parse_float_prefix(input: &str) -> Option<f64> {
    static FLOAT_PREFIX: OnceLock<Regex> = OnceLock::new();
    let regex = FLOAT_PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|[0-9]+\.?[0-9]*(?:[eE][+-]?[0-9]+)?|\.[0-9]+(?:[eE][+-]?[0-9]+)?)")
            .unwrap()
    });

    let prefix = regex.find(input.trim_start())?.as_str();
    prefix.parse::<f64>().ok()
}

fn is_uuid(candidate: &str) -> bool {
    static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = UUID_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
        )
        .unwrap()
    });
    regex.is_match(candidate)
}

/// Amount: a positive number, or a string holding one
///
/// Output is always a finite `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountSchema;

impl Schema for AmountSchema {
    type Output = f64;

    fn name(&self) -> &'static str {
        "amount"
    }

    fn validate(&self, raw: Option<&Value>) -> SchemaResult<f64> {
        let amount = match raw {
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| SchemaError::single(AMOUNT_REQUIRED))?,
            Some(Value::String(s)) => parse_float_prefix(s)
                .filter(|parsed| parsed.is_finite())
                .ok_or_else(|| SchemaError::single(AMOUNT_REQUIRED))?,
            _ => return Err(SchemaError::single(AMOUNT_REQUIRED)),
        };

        if amount <= 0.0 {
            return Err(SchemaError::single(AMOUNT_NOT_POSITIVE));
        }
        Ok(amount)
    }
}

/// Currency: a non-blank string, trimmed and upper-cased
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencySchema;

impl Schema for CurrencySchema {
    type Output = String;

    fn name(&self) -> &'static str {
        "currency"
    }

    fn validate(&self, raw: Option<&Value>) -> SchemaResult<String> {
        let Some(Value::String(s)) = raw else {
            return Err(SchemaError::single(CURRENCY_REQUIRED));
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::single(CURRENCY_EMPTY));
        }
        Ok(trimmed.to_uppercase())
    }
}

/// Create-payment body: exactly `{amount, currency}`
///
/// Field failures and unknown keys are all reported together, in the order
/// amount, currency, unknown keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatePaymentSchema;

impl Schema for CreatePaymentSchema {
    type Output = CreatePaymentInput;

    fn name(&self) -> &'static str {
        "create_payment"
    }

    fn validate(&self, raw: Option<&Value>) -> SchemaResult<CreatePaymentInput> {
        let Some(Value::Object(fields)) = raw else {
            return Err(SchemaError::single(PAYMENT_OBJECT_REQUIRED));
        };

        let amount = AmountSchema.validate(fields.get("amount"));
        let currency = CurrencySchema.validate(fields.get("currency"));

        let unknown: Vec<String> = fields
            .keys()
            .filter(|key| !CREATE_PAYMENT_KEYS.contains(&key.as_str()))
            .map(|key| format!("'{}'", key))
            .collect();

        let mut messages: Vec<String> = Vec::new();
        if let Err(err) = &amount {
            messages.extend(err.messages().iter().cloned());
        }
        if let Err(err) = &currency {
            messages.extend(err.messages().iter().cloned());
        }
        if !unknown.is_empty() {
            messages.push(format!(
                "Unrecognized key(s) in object: {}",
                unknown.join(", ")
            ));
        }
        if !messages.is_empty() {
            return Err(SchemaError::new(messages));
        }

        match (amount, currency) {
            (Ok(amount), Ok(currency)) if amount > 0.0 && !currency.is_empty() => {
                Ok(CreatePaymentInput { amount, currency })
            }
            _ => Err(SchemaError::single(PAYMENT_OBJECT_REQUIRED)),
        }
    }
}

/// Payment identifier: a trimmed UUID (versions 1-5, RFC variant)
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentIdSchema;

impl Schema for PaymentIdSchema {
    type Output = String;

    fn name(&self) -> &'static str {
        "payment_id"
    }

    fn validate(&self, raw: Option<&Value>) -> SchemaResult<String> {
        let Some(Value::String(s)) = raw else {
            return Err(SchemaError::single(PAYMENT_ID_REQUIRED));
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::single(PAYMENT_ID_EMPTY));
        }
        if !is_uuid(trimmed) {
            return Err(SchemaError::single(PAYMENT_ID_NOT_UUID));
        }
        Ok(trimmed.to_string())
    }
}

/// Optional currency filter
///
/// Absent or blank input is the explicit "no filter" value (`None`), never
/// an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyFilterSchema;

impl Schema for CurrencyFilterSchema {
    type Output = CurrencyFilter;

    fn name(&self) -> &'static str {
        "currency_filter"
    }

    fn validate(&self, raw: Option<&Value>) -> SchemaResult<CurrencyFilter> {
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_uppercase()))
                }
            }
            Some(_) => Err(SchemaError::single(CURRENCY_FILTER_NOT_STRING)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages<T: std::fmt::Debug>(result: SchemaResult<T>) -> String {
        result.unwrap_err().to_string()
    }

    // === AmountSchema ===

    #[test]
    fn test_amount_accepts_positive_number() {
        assert_eq!(AmountSchema.validate(Some(&json!(100))).unwrap(), 100.0);
        assert_eq!(AmountSchema.validate(Some(&json!(0.01))).unwrap(), 0.01);
    }

    #[test]
    fn test_amount_parses_numeric_string() {
        assert_eq!(AmountSchema.validate(Some(&json!("123.45"))).unwrap(), 123.45);
        assert_eq!(AmountSchema.validate(Some(&json!("  7"))).unwrap(), 7.0);
    }

    #[test]
    fn test_amount_parses_leading_numeric_prefix() {
        assert_eq!(AmountSchema.validate(Some(&json!("12abc"))).unwrap(), 12.0);
        assert_eq!(AmountSchema.validate(Some(&json!("1e3"))).unwrap(), 1000.0);
        assert_eq!(AmountSchema.validate(Some(&json!(".5"))).unwrap(), 0.5);
    }

    #[test]
    fn test_amount_prefix_stops_at_non_ascii_digit() {
        assert_eq!(AmountSchema.validate(Some(&json!("1\u{0663}"))).unwrap(), 1.0);
        assert!(AmountSchema.validate(Some(&json!("\u{0663}"))).is_err());
    }

    #[test]
    fn test_amount_unparsable_string_is_required_error() {
        assert_eq!(messages(AmountSchema.validate(Some(&json!("invalid")))), AMOUNT_REQUIRED);
        assert_eq!(messages(AmountSchema.validate(Some(&json!("")))), AMOUNT_REQUIRED);
    }

    #[test]
    fn test_amount_non_finite_string_rejected() {
        assert_eq!(messages(AmountSchema.validate(Some(&json!("Infinity")))), AMOUNT_REQUIRED);
        assert_eq!(messages(AmountSchema.validate(Some(&json!("1e400")))), AMOUNT_REQUIRED);
    }

    #[test]
    fn test_amount_zero_or_negative_rejected() {
        assert_eq!(messages(AmountSchema.validate(Some(&json!(0)))), AMOUNT_NOT_POSITIVE);
        assert_eq!(messages(AmountSchema.validate(Some(&json!(-10)))), AMOUNT_NOT_POSITIVE);
        assert_eq!(messages(AmountSchema.validate(Some(&json!("-5")))), AMOUNT_NOT_POSITIVE);
        assert_eq!(messages(AmountSchema.validate(Some(&json!("0")))), AMOUNT_NOT_POSITIVE);
    }

    #[test]
    fn test_amount_missing_or_wrong_type() {
        assert_eq!(messages(AmountSchema.validate(None)), AMOUNT_REQUIRED);
        assert_eq!(messages(AmountSchema.validate(Some(&json!(null)))), AMOUNT_REQUIRED);
        assert_eq!(messages(AmountSchema.validate(Some(&json!(true)))), AMOUNT_REQUIRED);
        assert_eq!(messages(AmountSchema.validate(Some(&json!([1])))), AMOUNT_REQUIRED);
    }

    // === CurrencySchema ===

    #[test]
    fn test_currency_trims_and_uppercases() {
        assert_eq!(CurrencySchema.validate(Some(&json!(" usd "))).unwrap(), "USD");
        assert_eq!(CurrencySchema.validate(Some(&json!("Eur"))).unwrap(), "EUR");
    }

    #[test]
    fn test_currency_blank_rejected() {
        assert_eq!(messages(CurrencySchema.validate(Some(&json!("   ")))), CURRENCY_EMPTY);
        assert_eq!(messages(CurrencySchema.validate(Some(&json!("")))), CURRENCY_EMPTY);
    }

    #[test]
    fn test_currency_missing_or_non_string() {
        assert_eq!(messages(CurrencySchema.validate(None)), CURRENCY_REQUIRED);
        assert_eq!(messages(CurrencySchema.validate(Some(&json!(840)))), CURRENCY_REQUIRED);
    }

    // === CreatePaymentSchema ===

    #[test]
    fn test_create_payment_normalizes_fields() {
        let input = CreatePaymentSchema
            .validate(Some(&json!({"amount": "123.45", "currency": "usd"})))
            .unwrap();
        assert_eq!(
            input,
            CreatePaymentInput {
                amount: 123.45,
                currency: "USD".to_string()
            }
        );
    }

    #[test]
    fn test_create_payment_reports_every_field_failure() {
        let result = CreatePaymentSchema.validate(Some(&json!({"amount": -1, "currency": " "})));
        assert_eq!(
            messages(result),
            "Amount must be a positive number, Currency must be a non-empty string"
        );
    }

    #[test]
    fn test_create_payment_missing_currency() {
        let result = CreatePaymentSchema.validate(Some(&json!({"amount": 100})));
        assert_eq!(messages(result), CURRENCY_REQUIRED);
    }

    #[test]
    fn test_create_payment_rejects_unknown_keys() {
        let result = CreatePaymentSchema.validate(Some(&json!({
            "amount": 10,
            "currency": "USD",
            "paymentId": "injected"
        })));
        assert_eq!(messages(result), "Unrecognized key(s) in object: 'paymentId'");
    }

    #[test]
    fn test_create_payment_unknown_keys_reported_after_field_errors() {
        let result = CreatePaymentSchema.validate(Some(&json!({"note": "x"})));
        let err = result.unwrap_err();
        assert_eq!(
            err.messages(),
            &[
                AMOUNT_REQUIRED.to_string(),
                CURRENCY_REQUIRED.to_string(),
                "Unrecognized key(s) in object: 'note'".to_string(),
            ]
        );
    }

    #[test]
    fn test_create_payment_requires_object() {
        assert_eq!(messages(CreatePaymentSchema.validate(None)), PAYMENT_OBJECT_REQUIRED);
        assert_eq!(
            messages(CreatePaymentSchema.validate(Some(&json!([1, 2])))),
            PAYMENT_OBJECT_REQUIRED
        );
        assert_eq!(
            messages(CreatePaymentSchema.validate(Some(&json!("amount")))),
            PAYMENT_OBJECT_REQUIRED
        );
    }

    // === PaymentIdSchema ===

    #[test]
    fn test_payment_id_accepts_trimmed_uuid() {
        let id = PaymentIdSchema
            .validate(Some(&json!("  123e4567-e89b-12d3-a456-426614174000 ")))
            .unwrap();
        assert_eq!(id, "123e4567-e89b-12d3-a456-426614174000");
    }

    #[test]
    fn test_payment_id_is_case_insensitive() {
        assert!(PaymentIdSchema
            .validate(Some(&json!("123E4567-E89B-42D3-A456-426614174000")))
            .is_ok());
    }

    #[test]
    fn test_payment_id_distinct_messages() {
        assert_eq!(messages(PaymentIdSchema.validate(None)), PAYMENT_ID_REQUIRED);
        assert_eq!(messages(PaymentIdSchema.validate(Some(&json!(42)))), PAYMENT_ID_REQUIRED);
        assert_eq!(messages(PaymentIdSchema.validate(Some(&json!("  ")))), PAYMENT_ID_EMPTY);
        assert_eq!(
            messages(PaymentIdSchema.validate(Some(&json!("not-a-uuid")))),
            PAYMENT_ID_NOT_UUID
        );
    }

    #[test]
    fn test_payment_id_rejects_bad_version_and_variant() {
        // version nibble 0
        assert!(PaymentIdSchema
            .validate(Some(&json!("123e4567-e89b-02d3-a456-426614174000")))
            .is_err());
        // version nibble 6
        assert!(PaymentIdSchema
            .validate(Some(&json!("123e4567-e89b-62d3-a456-426614174000")))
            .is_err());
        // variant nibble c
        assert!(PaymentIdSchema
            .validate(Some(&json!("123e4567-e89b-12d3-c456-426614174000")))
            .is_err());
    }

    #[test]
    fn test_payment_id_accepts_generated_v4() {
        let id = uuid::Uuid::new_v4().to_string();
        assert_eq!(PaymentIdSchema.validate(Some(&json!(id.clone()))).unwrap(), id);
    }

    // === CurrencyFilterSchema ===

    #[test]
    fn test_currency_filter_absent_or_blank_is_no_filter() {
        assert_eq!(CurrencyFilterSchema.validate(None).unwrap(), None);
        assert_eq!(CurrencyFilterSchema.validate(Some(&json!(""))).unwrap(), None);
        assert_eq!(CurrencyFilterSchema.validate(Some(&json!("  "))).unwrap(), None);
    }

    #[test]
    fn test_currency_filter_uppercases() {
        assert_eq!(
            CurrencyFilterSchema.validate(Some(&json!(" eur "))).unwrap(),
            Some("EUR".to_string())
        );
    }

    #[test]
    fn test_currency_filter_rejects_non_string() {
        assert_eq!(
            messages(CurrencyFilterSchema.validate(Some(&json!(5)))),
            CURRENCY_FILTER_NOT_STRING
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let raw = json!({"amount": "19.99", "currency": " gbp"});
        let first = CreatePaymentSchema.validate(Some(&raw)).unwrap();
        let second = CreatePaymentSchema.validate(Some(&raw)).unwrap();
        assert_eq!(first, second);
    }
}
