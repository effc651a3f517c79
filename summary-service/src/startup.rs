//! Application startup and lifecycle management.

use crate::config::SummaryConfig;
use crate::handlers;
use crate::services::SummaryService;
use axum::{
    Router,
    routing::{get, post},
};
use service_core::clients::{DocumentClient, GenaiClient};
use service_core::error::AppError;
use service_core::observability::AiUsageMetrics;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: SummaryConfig,
    pub documents: DocumentClient,
    pub summaries: Arc<SummaryService>,
    pub metrics: AiUsageMetrics,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: SummaryConfig) -> Result<Self, AppError> {
        let documents = DocumentClient::new(&config.document_service.base_url);
        let genai = GenaiClient::new(&config.genai_service.base_url);
        let metrics = AiUsageMetrics::new();
        let summaries = Arc::new(SummaryService::new(genai, metrics.clone()));

        tracing::info!(
            document_service = %config.document_service.base_url,
            genai_service = %config.genai_service.base_url,
            "Initialized service clients"
        );

        let state = AppState {
            config: config.clone(),
            documents,
            summaries,
            metrics,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/api/summary/health", get(handlers::health_check))
            .route("/api/summary", post(handlers::generate_summary))
            .route("/metrics", get(handlers::metrics))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
