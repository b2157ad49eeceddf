//! DynamoDB implementation of PaymentRepository

use crate::config::AppConfig;
use crate::core::{Payment, PaymentRepository};
use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDBClient;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

/// Region used against a local DynamoDB in test mode
const LOCAL_REGION: &str = "local-env";

type Item = HashMap<String, AttributeValue>;

/// Build the DynamoDB client selected by the configuration
///
/// In test mode the client points at the configured endpoint with static
/// `test` credentials. Otherwise it targets the configured region and
/// resolves credentials through the default AWS provider chain
/// (environment, profile, web identity, container and instance roles).
pub async fn build_client(config: &AppConfig) -> DynamoDBClient {
    if config.environment.is_test {
        tracing::info!(endpoint = %config.aws.dynamodb_endpoint, "Using test DynamoDB configuration");
        let local = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(LOCAL_REGION))
            .endpoint_url(config.aws.dynamodb_endpoint.clone())
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .build();
        return DynamoDBClient::from_conf(local);
    }

    tracing::info!(region = %config.aws.region, "Using AWS DynamoDB configuration");
    let shared = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws.region.clone()))
        .load()
        .await;
    DynamoDBClient::new(&shared)
}

/// DynamoDB implementation of PaymentRepository
///
/// Items are keyed by `paymentId`. The client is constructed once by the
/// caller and shared.
#[derive(Clone)]
pub struct DynamoDBPaymentRepository {
    client: DynamoDBClient,
    table_name: String,
}

impl DynamoDBPaymentRepository {
    pub fn new(client: DynamoDBClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Scan the whole table, following pagination, with an optional
    /// `currency = :currency` filter
    async fn scan(&self, currency: Option<&str>) -> Result<Vec<Payment>> {
        let mut payments = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take());

            if let Some(currency) = currency {
                request = request
                    .filter_expression("currency = :currency")
                    .expression_attribute_values(":currency", AttributeValue::S(currency.to_string()));
            }

            let output = request.send().await?;

            for item in output.items.unwrap_or_default() {
                payments.push(item_to_payment(item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(payments)
    }
}

fn payment_to_item(payment: &Payment) -> Result<Item> {
    Ok(serde_dynamo::to_item(payment)?)
}

fn item_to_payment(item: Item) -> Result<Payment> {
    Ok(serde_dynamo::from_item(item)?)
}

#[async_trait]
impl PaymentRepository for DynamoDBPaymentRepository {
    async fn fetch_by_id(&self, payment_id: &str) -> Result<Option<Payment>> {
        tracing::debug!(payment_id = %payment_id, table = %self.table_name, "Fetching payment by ID");

        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("paymentId", AttributeValue::S(payment_id.to_string()))
            .send()
            .await
            .inspect_err(|e| tracing::error!(payment_id = %payment_id, error = %e, "Error fetching payment by ID"))?;

        let payment = result.item.map(item_to_payment).transpose()?;
        tracing::debug!(payment_id = %payment_id, found = payment.is_some(), "Payment fetch result");
        Ok(payment)
    }

    async fn create(&self, payment: &Payment) -> Result<()> {
        tracing::debug!(
            payment_id = %payment.payment_id,
            amount = payment.amount,
            currency = %payment.currency,
            table = %self.table_name,
            "Creating payment"
        );

        let item = payment_to_item(payment)?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .inspect_err(|e| tracing::error!(payment_id = %payment.payment_id, error = %e, "Error creating payment"))?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Payment>> {
        tracing::debug!(table = %self.table_name, "Listing all payments");

        let payments = self.scan(None).await.inspect_err(|e| {
            tracing::error!(error = %e, "Error listing all payments");
        })?;

        tracing::debug!(count = payments.len(), "Listed payments");
        Ok(payments)
    }

    async fn list_by_currency(&self, currency: &str) -> Result<Vec<Payment>> {
        let normalized = currency.to_uppercase();
        tracing::debug!(currency = %normalized, table = %self.table_name, "Listing payments by currency");

        let payments = self.scan(Some(&normalized)).await.inspect_err(|e| {
            tracing::error!(currency = %normalized, error = %e, "Error listing payments by currency");
        })?;

        tracing::debug!(currency = %normalized, count = payments.len(), "Listed payments by currency");
        Ok(payments)
    }
}
