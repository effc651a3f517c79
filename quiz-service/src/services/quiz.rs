//! Schema-constrained quiz generation from raw document bytes.

use crate::dtos::{LlmQuizQuestion, QuizQuestion};
use crate::services::prompts;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use service_core::clients::genai::GenaiError;
use service_core::clients::{GenaiClient, GenerateContentRequest, Part};
use service_core::error::AppError;
use service_core::observability::AiUsageMetrics;

/// Metrics label for quiz generations.
const MODEL_NAME: &str = "gemini-2.5-flash-lite";

pub struct QuizService {
    genai: GenaiClient,
    metrics: AiUsageMetrics,
}

impl QuizService {
    pub fn new(genai: GenaiClient, metrics: AiUsageMetrics) -> Self {
        Self { genai, metrics }
    }

    /// Generate exam questions from the document's raw bytes.
    ///
    /// The document travels inline as base64 PDF data, and the model is bound
    /// to the quiz question schema. Unparsable or out-of-range output is a
    /// hard failure; there is no well-formed empty quiz.
    pub async fn generate_quiz(
        &self,
        document_bytes: &[u8],
    ) -> Result<Vec<QuizQuestion>, AppError> {
        let parts = vec![
            Part::inline_data("application/pdf", BASE64.encode(document_bytes)),
            Part::text(prompts::QUIZ_PROMPT),
        ];

        let schema = serde_json::to_value(schemars::schema_for!(Vec<LlmQuizQuestion>))
            .map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("Failed to build response schema: {}", e))
            })?;

        let request =
            GenerateContentRequest::with_parts(parts, prompts::SYSTEM_PROMPT).with_schema(schema);

        let content = match self.genai.generate_content(&request).await {
            Ok(content) => content,
            Err(e) => {
                self.metrics.record_request(MODEL_NAME, "failed");
                tracing::error!(error = %e, "Error generating quiz");
                return Err(e.into());
            }
        };

        let Some(text) = content.first_text() else {
            self.metrics.record_request(MODEL_NAME, "failed");
            return Err(GenaiError::MissingText.into());
        };

        let questions = match parse_questions(text) {
            Ok(questions) => questions,
            Err(e) => {
                self.metrics.record_request(MODEL_NAME, "failed");
                tracing::error!(error = %e, "Model returned malformed quiz output");
                return Err(e);
            }
        };

        self.metrics.record_request(MODEL_NAME, "success");
        tracing::info!(count = questions.len(), "Generated quiz questions");

        Ok(questions)
    }
}

/// Parse and validate the model's JSON answer, assigning fresh ids and
/// flattening the option fields into one ordered list per question.
pub(crate) fn parse_questions(text: &str) -> Result<Vec<QuizQuestion>, AppError> {
    let raw: Vec<LlmQuizQuestion> = serde_json::from_str(text)
        .map_err(|e| AppError::MalformedModelOutput(format!("invalid quiz JSON: {}", e)))?;

    raw.into_iter().map(QuizQuestion::try_from).collect()
}
