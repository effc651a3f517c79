//! Model provider abstraction and implementations.
//!
//! A trait seam over the third-party generation API so handlers stay
//! independent of the concrete backend.

pub mod gemini;

use async_trait::async_trait;
use service_core::clients::genai::Content;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Model returned no candidates")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Result of one generation call: the first candidate's content plus usage.
pub struct ProviderResponse {
    pub content: Content,
    pub usage: TokenUsage,
}

/// Trait for text/JSON generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Run one generation call. A transport failure, a non-2xx answer and an
    /// answer with zero candidates are all hard errors; there is no empty
    /// success state.
    async fn generate(
        &self,
        contents: &[Content],
        system_prompt: Option<&str>,
        temperature: f32,
        response_schema: Option<&serde_json::Value>,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Whether the provider has credentials to serve requests.
    fn is_configured(&self) -> bool;

    /// Model identifier used for logging and metrics labels.
    fn model(&self) -> &str;
}
