use anyhow::Result;
use payments::config::{AppConfig, StorageBackend};
use payments::core::PaymentRepository;
use payments::server::ServerBuilder;
use payments::storage::InMemoryPaymentRepository;
use std::sync::Arc;

async fn build_repository(config: &AppConfig) -> Result<Arc<dyn PaymentRepository>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory payment storage");
            Ok(Arc::new(InMemoryPaymentRepository::new()))
        }
        #[cfg(feature = "dynamodb")]
        StorageBackend::DynamoDb => {
            let client = payments::storage::build_client(config).await;
            tracing::info!(table = %config.tables.payments, "Using DynamoDB payment storage");
            Ok(Arc::new(payments::storage::DynamoDBPaymentRepository::new(
                client,
                config.tables.payments.clone(),
            )))
        }
        #[cfg(not(feature = "dynamodb"))]
        StorageBackend::DynamoDb => {
            anyhow::bail!("DynamoDB storage requested but the `dynamodb` feature is not enabled")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .init();

    tracing::info!(
        environment = %config.environment.name,
        test_mode = config.environment.is_test,
        "Starting payments API"
    );

    let repository = build_repository(&config).await?;

    ServerBuilder::new()
        .with_shared_repository(repository)
        .serve(&config.server.bind_addr)
        .await
}
