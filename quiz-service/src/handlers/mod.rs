use crate::dtos::QuizQuestion;
use crate::startup::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use service_core::error::AppError;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "quiz-service",
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

pub async fn generate_quiz(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Vec<QuizQuestion>>, AppError> {
    tracing::info!(%document_id, "Processing quiz request");

    let Some(document_bytes) = state.documents.download_document(&document_id).await else {
        return Err(AppError::NotFound(anyhow::anyhow!("Document not found")));
    };

    let questions = state.quizzes.generate_quiz(&document_bytes).await?;

    Ok(Json(questions))
}
