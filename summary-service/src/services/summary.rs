//! Whole-document summary generation.

use crate::services::prompts;
use service_core::clients::genai::GenaiError;
use service_core::clients::{DocumentChunk, GenaiClient, GenerateContentRequest};
use service_core::observability::AiUsageMetrics;

/// Metrics label for summary generations.
const MODEL_NAME: &str = "gemini-2.5-flash-lite";

/// Documents longer than this are cut before prompting.
const MAX_CONTENT_LENGTH: usize = 10_000;

pub struct SummaryService {
    genai: GenaiClient,
    metrics: AiUsageMetrics,
}

impl SummaryService {
    pub fn new(genai: GenaiClient, metrics: AiUsageMetrics) -> Self {
        Self { genai, metrics }
    }

    /// Summarize a document from its full chunk list. An empty chunk list
    /// yields the canned no-content summary without a gateway call.
    pub async fn generate_document_summary(
        &self,
        document_name: &str,
        chunks: &[DocumentChunk],
    ) -> Result<String, GenaiError> {
        if chunks.is_empty() {
            self.metrics.record_request(MODEL_NAME, "no_chunks");
            return Ok(prompts::NO_CONTENT_SUMMARY.to_string());
        }

        let content = combine_chunks(chunks);
        let request = GenerateContentRequest::from_text(
            prompts::render_summary_prompt(&content),
            prompts::render_system_prompt(document_name),
        );

        let response = match self.genai.generate_content(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_request(MODEL_NAME, "failed");
                tracing::error!(document_name, error = %e, "Error generating summary");
                return Err(e);
            }
        };

        let Some(text) = response.first_text() else {
            self.metrics.record_request(MODEL_NAME, "failed");
            return Err(GenaiError::MissingText);
        };

        self.metrics.record_request(MODEL_NAME, "success");
        tracing::info!(
            document_name,
            chunks = chunks.len(),
            "AI summary request completed"
        );

        Ok(text.to_string())
    }
}

/// Concatenate chunk texts in order, truncating over-long documents with an
/// explicit marker so the model knows content is missing.
pub(crate) fn combine_chunks(chunks: &[DocumentChunk]) -> String {
    let mut combined = String::new();
    for chunk in chunks {
        combined.push_str(&chunk.text);
        combined.push_str("\n\n");
    }

    if combined.len() > MAX_CONTENT_LENGTH {
        // Cut on a char boundary; multi-byte text must not panic here.
        let mut cut = MAX_CONTENT_LENGTH;
        while !combined.is_char_boundary(cut) {
            cut -= 1;
        }
        combined.truncate(cut);
        combined.push_str(prompts::TRUNCATION_MARKER);
    }

    combined
}
