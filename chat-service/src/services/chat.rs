//! RAG response generation for the chat endpoint.

use crate::services::prompts;
use service_core::clients::genai::GenaiError;
use service_core::clients::{
    ConversationMessage, DocumentChunk, GenaiClient, GenerateContentRequest,
};
use service_core::observability::AiUsageMetrics;

/// Metrics label for chat generations.
const MODEL_NAME: &str = "gemini-2.5-flash-lite";

/// Only the most recent turns go into the prompt to stay inside token limits.
const HISTORY_WINDOW: usize = 10;

/// Number of chunks requested from similarity search.
pub const CHUNK_LIMIT: usize = 5;

pub struct ChatService {
    genai: GenaiClient,
    metrics: AiUsageMetrics,
}

impl ChatService {
    pub fn new(genai: GenaiClient, metrics: AiUsageMetrics) -> Self {
        Self { genai, metrics }
    }

    /// Answer `query` from retrieved chunks and stored conversation history.
    ///
    /// With neither chunks nor history there is nothing to ground an answer
    /// in, so a canned message comes back without any gateway call. Gateway
    /// failures propagate; retrieval has already degraded before this point.
    pub async fn generate_rag_response(
        &self,
        query: &str,
        chunks: &[DocumentChunk],
        history: &[ConversationMessage],
    ) -> Result<String, GenaiError> {
        let Some(prompt) = build_prompt(query, chunks, history) else {
            self.metrics.record_request(MODEL_NAME, "no_content");
            return Ok(prompts::NO_CONTEXT_MESSAGE.to_string());
        };

        let request = GenerateContentRequest::from_text(prompt, prompts::SYSTEM_PROMPT);

        let content = match self.genai.generate_content(&request).await {
            Ok(content) => content,
            Err(e) => {
                self.metrics.record_request(MODEL_NAME, "failed");
                tracing::error!(error = %e, "Error generating AI response");
                return Err(e);
            }
        };

        let Some(text) = content.first_text() else {
            self.metrics.record_request(MODEL_NAME, "failed");
            return Err(GenaiError::MissingText);
        };

        self.metrics.record_request(MODEL_NAME, "success");
        tracing::info!(
            chunks = chunks.len(),
            history = history.len(),
            "AI request completed"
        );

        Ok(text.to_string())
    }
}

/// Assemble the full prompt, or `None` when there is no material at all.
pub(crate) fn build_prompt(
    query: &str,
    chunks: &[DocumentChunk],
    history: &[ConversationMessage],
) -> Option<String> {
    if chunks.is_empty() && history.is_empty() {
        return None;
    }

    let context = if chunks.is_empty() {
        prompts::NO_DOCUMENT_CONTEXT.to_string()
    } else {
        let mut context = String::new();
        for chunk in chunks {
            context.push_str(&chunk.text);
            context.push_str("\n\n");
        }
        context
    };

    let conversation_history = if history.is_empty() {
        prompts::NO_CONVERSATION.to_string()
    } else {
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        let mut rendered = String::new();
        for message in &history[start..] {
            let role = if message.is_human() {
                "Human"
            } else {
                "Assistant"
            };
            rendered.push_str(role);
            rendered.push_str(": ");
            rendered.push_str(&message.content);
            rendered.push('\n');
        }
        rendered
    };

    Some(prompts::render_rag_prompt(
        &context,
        &conversation_history,
        query,
    ))
}
