//! AI usage metrics.
//!
//! Request and token counters for the generation pipeline. The collector is
//! injected through each service's `AppState` instead of living in globals,
//! so every service (and test) gets an isolated registry.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct AiUsageMetrics {
    registry: Arc<Registry>,
    requests: IntCounterVec,
    tokens: IntCounterVec,
}

impl AiUsageMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("ai_requests_total", "Total number of AI requests"),
            &["model", "status"],
        )
        .expect("Failed to create ai_requests_total metric");

        let tokens = IntCounterVec::new(
            Opts::new("ai_tokens_used_total", "Total tokens used by AI model"),
            &["model", "token_type"],
        )
        .expect("Failed to create ai_tokens_used_total metric");

        registry
            .register(Box::new(requests.clone()))
            .expect("Failed to register ai_requests_total");
        registry
            .register(Box::new(tokens.clone()))
            .expect("Failed to register ai_tokens_used_total");

        Self {
            registry: Arc::new(registry),
            requests,
            tokens,
        }
    }

    /// Record one completed generation request.
    pub fn record_request(&self, model: &str, status: &str) {
        self.requests.with_label_values(&[model, status]).inc();
    }

    /// Record token usage reported by the model API.
    pub fn record_tokens(&self, model: &str, token_type: &str, count: u64) {
        self.tokens
            .with_label_values(&[model, token_type])
            .inc_by(count);
    }

    /// Get metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();

        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return format!("# Failed to encode metrics: {}\n", e);
        }

        match String::from_utf8(buffer) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
                format!("# Failed to convert metrics to UTF-8: {}\n", e)
            }
        }
    }
}

impl Default for AiUsageMetrics {
    fn default() -> Self {
        Self::new()
    }
}
