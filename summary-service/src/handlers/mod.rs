use crate::dtos::{SummaryRequest, SummaryResponse};
use crate::startup::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use service_core::error::AppError;
use validator::Validate;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "summary-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        state.metrics.render(),
    )
}

pub async fn generate_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    request.validate()?;

    tracing::info!(document_id = %request.document_id, "Processing summary request");

    let chunks = state.documents.get_all_chunks(&request.document_id).await;

    let document_name = format!("Document {}", request.document_id);
    let summary = state
        .summaries
        .generate_document_summary(&document_name, &chunks)
        .await?;

    tracing::info!(
        document_id = %request.document_id,
        chunks = chunks.len(),
        "Generated summary"
    );

    Ok(Json(SummaryResponse {
        document_id: request.document_id,
        summary,
    }))
}
