//! Application startup and lifecycle management.

use crate::config::GenaiConfig;
use crate::handlers;
use crate::services::providers::TextProvider;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use axum::{
    Router,
    routing::{get, post},
};
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
    pub config: GenaiConfig,
    pub text_provider: Arc<dyn TextProvider>,
    pub metrics: AiUsageMetrics,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: GenaiConfig) -> Result<Self, AppError> {
        let gemini_config = GeminiConfig {
            api_key: config.google.api_key.clone(),
            api_base: config.google.api_base.clone(),
            model: config.models.text_model.clone(),
        };
        let text_provider: Arc<dyn TextProvider> = Arc::new(GeminiTextProvider::new(gemini_config));

        if text_provider.is_configured() {
            tracing::info!(
                model = %config.models.text_model,
                "Initialized Gemini text provider"
            );
        } else {
            tracing::warn!("GEMINI_API_KEY not set - starting in degraded mode");
        }

        let state = AppState {
            config: config.clone(),
            text_provider,
            metrics: AiUsageMetrics::new(),
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/api/genai/health", get(handlers::health_check))
            .route(
                "/api/genai/generate-content",
                post(handlers::generate_content),
            )
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
