use serde::{Deserialize, Serialize};
use service_core::clients::Document;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    #[serde(default)]
    pub document_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// Full document with its updated conversation, when the request named one.
    pub document: Option<Document>,
    /// Distinct names of the documents the retrieved chunks came from.
    pub sources: Vec<String>,
    pub chunk_count: usize,
}
