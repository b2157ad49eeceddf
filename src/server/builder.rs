//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::PaymentEndpoints;
use super::router::build_payment_routes;
use crate::core::repository::PaymentRepository;
use crate::core::service::PaymentService;
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the payments HTTP server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_repository(InMemoryPaymentRepository::new())
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    repository: Option<Arc<dyn PaymentRepository>>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payment repository (required)
    pub fn with_repository(mut self, repository: impl PaymentRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Set an already shared payment repository
    pub fn with_shared_repository(mut self, repository: Arc<dyn PaymentRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Build the router with every payment route registered
    pub fn build(self) -> Result<Router> {
        let repository = self
            .repository
            .ok_or_else(|| anyhow!("a payment repository is required"))?;

        let service = PaymentService::new(repository);
        Ok(build_payment_routes(PaymentEndpoints::new(service)))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
