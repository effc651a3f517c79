use crate::dtos::{ChatRequest, ChatResponse};
use crate::services::chat::CHUNK_LIMIT;
use crate::startup::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use service_core::clients::{Document, MessageRole};
use service_core::error::AppError;
use validator::Validate;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "chat-service",
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

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    request.validate()?;

    tracing::info!(document_id = ?request.document_id, "Processing chat request");

    // Document metadata and chunk retrieval are independent of each other.
    let (document, chunks) = match &request.document_id {
        Some(document_id) => {
            tokio::join!(
                state.documents.get_document_by_id(document_id),
                state
                    .documents
                    .search_similar_chunks(&request.message, CHUNK_LIMIT)
            )
        }
        None => {
            let chunks = state
                .documents
                .search_similar_chunks(&request.message, CHUNK_LIMIT)
                .await;
            (None, chunks)
        }
    };

    let history = document
        .as_ref()
        .map(|d| d.conversation.as_slice())
        .unwrap_or(&[]);

    let answer = state
        .chat
        .generate_rag_response(&request.message, &chunks, history)
        .await?;

    let document = match &request.document_id {
        Some(document_id) if document.is_some() => {
            persist_conversation(&state, document_id, &request.message, &answer)
                .await
                .or(document)
        }
        _ => document,
    };

    let mut sources: Vec<String> = Vec::new();
    for chunk in &chunks {
        if !sources.contains(&chunk.document_name) {
            sources.push(chunk.document_name.clone());
        }
    }

    Ok(Json(ChatResponse {
        response: answer,
        document,
        sources,
        chunk_count: chunks.len(),
    }))
}

/// Append both turns to the stored conversation and re-read the document so
/// the response carries the updated history. Best-effort throughout: append
/// or re-read failures never fail the chat response.
async fn persist_conversation(
    state: &AppState,
    document_id: &str,
    question: &str,
    answer: &str,
) -> Option<Document> {
    state
        .documents
        .add_conversation_message(document_id, MessageRole::Human, question)
        .await;
    state
        .documents
        .add_conversation_message(document_id, MessageRole::Assistant, answer)
        .await;
    state.documents.get_document_by_id(document_id).await
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Document>, AppError> {
    state
        .documents
        .get_document_by_id(&document_id)
        .await
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!(
                "Document not found with ID: {}",
                document_id
            ))
        })
}
