use crate::services::providers::ProviderError;
use crate::startup::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use service_core::clients::genai::{GenerateContentRequest, GenerateContentResponse};
use service_core::error::AppError;
use validator::Validate;

/// Liveness probe. A missing API key is announced here as degraded rather
/// than rejected at startup.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.text_provider.is_configured() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "genai-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "service": "genai-service",
                "error": "GEMINI_API_KEY is not configured"
            })),
        )
    }
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        state.metrics.render(),
    )
}

pub async fn generate_content(
    State(state): State<AppState>,
    Json(request): Json<GenerateContentRequest>,
) -> Result<Json<GenerateContentResponse>, AppError> {
    request.validate()?;

    if request
        .contents
        .iter()
        .any(|content| content.parts.is_empty())
    {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "every content block needs at least one part"
        )));
    }

    if !state.text_provider.is_configured() {
        return Err(AppError::ServiceUnavailable);
    }

    let model = state.text_provider.model().to_string();

    let result = state
        .text_provider
        .generate(
            &request.contents,
            request.system_prompt.as_deref(),
            request.temperature,
            request.response_schema.as_ref(),
        )
        .await;

    match result {
        Ok(response) => {
            state.metrics.record_request(&model, "success");
            state
                .metrics
                .record_tokens(&model, "prompt", response.usage.prompt_tokens);
            state
                .metrics
                .record_tokens(&model, "completion", response.usage.completion_tokens);

            Ok(Json(GenerateContentResponse {
                content: response.content,
            }))
        }
        Err(e) => {
            state.metrics.record_request(&model, "failed");
            tracing::error!(error = %e, "Generation failed");
            Err(provider_error(e))
        }
    }
}

/// Map provider failures onto the service error taxonomy.
fn provider_error(error: ProviderError) -> AppError {
    match error {
        ProviderError::NotConfigured(_) => AppError::ServiceUnavailable,
        ProviderError::ApiError(msg) => AppError::BadGateway(msg),
        ProviderError::RateLimited => {
            AppError::TooManyRequests("Rate limited by model provider".to_string())
        }
        ProviderError::EmptyResponse => {
            AppError::MalformedModelOutput("model returned no candidates".to_string())
        }
        ProviderError::NetworkError(msg) => AppError::BadGateway(msg),
    }
}
