//! HTTP client for the generation gateway, plus the wire contract shared
//! between callers and the gateway itself.

use crate::error::AppError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Generation calls can take minutes for large documents.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

const DEFAULT_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum GenaiError {
    #[error("Failed to reach generation service: {0}")]
    Transport(String),

    #[error("Generation service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Generated content contained no text part")]
    MissingText,
}

impl From<GenaiError> for AppError {
    fn from(err: GenaiError) -> Self {
        match err {
            GenaiError::Transport(msg) => AppError::BadGateway(msg),
            GenaiError::Upstream { status, message } => AppError::BadGateway(format!(
                "generation service returned {}: {}",
                status, message
            )),
            GenaiError::MissingText => AppError::MalformedModelOutput(
                "generated content contained no text part".to_string(),
            ),
        }
    }
}

/// One piece of a content block: either text or inline binary data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// Base64-encoded binary part with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One logical message sent to or received from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }

    /// Text of the first part, if the first part is text.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            Part::InlineData { .. } => None,
        })
    }
}

/// Request body for `POST /api/genai/generate-content`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateContentRequest {
    #[validate(length(min = 1, message = "contents must not be empty"))]
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default = "default_temperature")]
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl GenerateContentRequest {
    /// Single text message with a system prompt, at the default temperature.
    pub fn from_text(message: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::from_text(message)],
            system_prompt: Some(system_prompt.into()),
            temperature: DEFAULT_TEMPERATURE,
            response_schema: None,
        }
    }

    /// Single content block built from the given parts.
    pub fn with_parts(parts: Vec<Part>, system_prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content { parts }],
            system_prompt: Some(system_prompt.into()),
            temperature: DEFAULT_TEMPERATURE,
            response_schema: None,
        }
    }

    /// Ask for JSON output conforming to `schema`.
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Response body from `POST /api/genai/generate-content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    pub content: Content,
}

#[derive(Clone)]
pub struct GenaiClient {
    http: Client,
    base_url: String,
}

impl GenaiClient {
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

    /// Send one generation request. Failures here always propagate: a missing
    /// or malformed answer has no usable empty state.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Content, GenaiError> {
        let url = format!("{}/api/genai/generate-content", self.base_url);

        tracing::debug!(
            contents = request.contents.len(),
            temperature = %request.temperature,
            structured = request.response_schema.is_some(),
            "Sending generation request"
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| GenaiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenaiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenaiError::Transport(e.to_string()))?;

        Ok(body.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_parts_serialize_flat() {
        let part = Part::text("hello");
        assert_eq!(serde_json::to_value(&part).unwrap(), json!({"text": "hello"}));
    }

    #[test]
    fn inline_parts_nest_under_inline_data() {
        let part = Part::inline_data("application/pdf", "aGVsbG8=");
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({"inline_data": {"mime_type": "application/pdf", "data": "aGVsbG8="}})
        );
    }

    #[test]
    fn temperature_defaults_when_absent() {
        let request: GenerateContentRequest =
            serde_json::from_value(json!({"contents": [{"parts": [{"text": "hi"}]}]})).unwrap();
        assert_eq!(request.temperature, 0.1);
        assert!(request.system_prompt.is_none());
    }

    #[test]
    fn temperature_outside_range_fails_validation() {
        let request: GenerateContentRequest = serde_json::from_value(
            json!({"contents": [{"parts": [{"text": "hi"}]}], "temperature": 3.0}),
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn first_text_skips_nothing_but_first_part() {
        let content = Content {
            parts: vec![Part::inline_data("application/pdf", "x"), Part::text("hi")],
        };
        assert!(content.first_text().is_none());

        let content = Content::from_text("hi");
        assert_eq!(content.first_text(), Some("hi"));
    }
}
