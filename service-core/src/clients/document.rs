//! HTTP client for the document store.
//!
//! Retrieval operations are best-effort: failures are logged and degrade to
//! empty/absent results, so callers treat "nothing found" and "store
//! unreachable" the same way. Conversation appends report success as a bool
//! and never propagate errors.

use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Per-call timeout for document store requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A document held by the document store, including its stored conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub name: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    pub chunk_count: i64,
    #[serde(default)]
    pub conversation: Vec<ConversationMessage>,
}

/// One turn in a document's stored chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub message_index: i32,
    pub message_type: String,
    pub content: String,
    pub created_at: String,
}

impl ConversationMessage {
    /// Whether this turn came from the human side of the conversation.
    /// Any unknown message type is treated as the assistant's.
    pub fn is_human(&self) -> bool {
        self.message_type == MessageRole::Human.as_wire()
    }
}

/// One retrieved passage of a document.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    pub text: String,
    pub document_id: i64,
    pub document_name: String,
    pub original_filename: String,
    pub chunk_index: i32,
}

/// Role attached to appended conversation turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    Human,
    Assistant,
}

impl MessageRole {
    pub fn as_wire(&self) -> &'static str {
        match self {
            MessageRole::Human => "HUMAN",
            MessageRole::Assistant => "AI",
        }
    }
}

/// Chunk payload as returned by the store's search and chunk endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChunkPayload {
    text: String,
    document_id: i64,
    #[serde(default)]
    chunk_index: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppendMessageRequest<'a> {
    message_type: &'a str,
    content: &'a str,
}

#[derive(Clone)]
pub struct DocumentClient {
    http: Client,
    base_url: String,
}

impl DocumentClient {
    pub fn new(base_url: &str) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch a document with its metadata and conversation. Absent documents
    /// and transport failures both come back as `None`.
    pub async fn get_document_by_id(&self, document_id: &str) -> Option<Document> {
        tracing::info!(document_id, "Fetching document");

        let url = format!("{}/api/documents/{}", self.base_url, document_id);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(document_id, error = %e, "Error fetching document");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(document_id, status = %response.status(), "Document not found");
            return None;
        }

        match response.json::<Document>().await {
            Ok(document) => {
                tracing::info!(document_id, name = %document.name, "Successfully fetched document");
                Some(document)
            }
            Err(e) => {
                tracing::error!(document_id, error = %e, "Error decoding document");
                None
            }
        }
    }

    /// Retrieve up to `limit` chunks ranked by the store's similarity search,
    /// enriched with the owning document's name. Document lookups are cached
    /// for the duration of one call.
    pub async fn search_similar_chunks(&self, query: &str, limit: usize) -> Vec<DocumentChunk> {
        tracing::info!(query, limit, "Searching similar chunks");

        let url = format!("{}/api/documents/search/similar", self.base_url);
        let limit_param = limit.to_string();
        let response = match self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", limit_param.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(query, error = %e, "Error searching similar chunks");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(query, status = %response.status(), "Similarity search failed");
            return Vec::new();
        }

        let payload: Vec<ChunkPayload> = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(query, error = %e, "Error decoding similarity search response");
                return Vec::new();
            }
        };

        let mut chunks = Vec::with_capacity(payload.len());
        let mut document_cache: HashMap<i64, Option<Document>> = HashMap::new();

        for chunk in payload {
            if !document_cache.contains_key(&chunk.document_id) {
                let document = self.get_document_by_id(&chunk.document_id.to_string()).await;
                document_cache.insert(chunk.document_id, document);
            }
            let document = document_cache
                .get(&chunk.document_id)
                .and_then(|d| d.as_ref());

            chunks.push(DocumentChunk {
                text: chunk.text,
                document_id: chunk.document_id,
                document_name: document
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| format!("Document {}", chunk.document_id)),
                original_filename: document
                    .map(|d| d.original_filename.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                chunk_index: chunk.chunk_index,
            });
        }

        tracing::info!(count = chunks.len(), "Retrieved chunks from similarity search");
        chunks
    }

    /// Fetch every chunk of one document, in chunk order.
    pub async fn get_all_chunks(&self, document_id: &str) -> Vec<DocumentChunk> {
        tracing::info!(document_id, "Fetching all chunks");

        let url = format!("{}/api/documents/{}/chunks", self.base_url, document_id);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(document_id, error = %e, "Error fetching chunks");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(document_id, status = %response.status(), "Chunk fetch failed");
            return Vec::new();
        }

        let payload: Vec<ChunkPayload> = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(document_id, error = %e, "Error decoding chunk response");
                return Vec::new();
            }
        };

        let chunks: Vec<DocumentChunk> = payload
            .into_iter()
            .map(|chunk| DocumentChunk {
                text: chunk.text,
                document_id: chunk.document_id,
                document_name: format!("Document {}", document_id),
                original_filename: "Unknown".to_string(),
                chunk_index: chunk.chunk_index,
            })
            .collect();

        tracing::info!(document_id, count = chunks.len(), "Retrieved document chunks");
        chunks
    }

    /// Download a document's raw bytes.
    pub async fn download_document(&self, document_id: &str) -> Option<Vec<u8>> {
        tracing::info!(document_id, "Downloading document");

        let url = format!("{}/api/documents/{}/download", self.base_url, document_id);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(document_id, error = %e, "Error downloading document");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(document_id, status = %response.status(), "Document download failed");
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                tracing::error!(document_id, error = %e, "Error reading document bytes");
                None
            }
        }
    }

    /// Append one turn to a document's stored conversation. Failures are
    /// logged and swallowed; the caller's response must not depend on them.
    pub async fn add_conversation_message(
        &self,
        document_id: &str,
        role: MessageRole,
        content: &str,
    ) -> bool {
        tracing::info!(document_id, role = role.as_wire(), "Appending conversation message");

        let url = format!("{}/api/documents/{}/conversation", self.base_url, document_id);
        let body = AppendMessageRequest {
            message_type: role.as_wire(),
            content,
        };

        match self.http.post(&url).json(&body).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(document_id, status = %response.status(), "Failed to append message");
                false
            }
            Err(e) => {
                tracing::error!(document_id, error = %e, "Error appending message");
                false
            }
        }
    }
}
