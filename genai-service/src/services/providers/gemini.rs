//! Gemini AI provider implementation.
//!
//! Implements content generation against Google's Gemini REST API.

use super::{ProviderError, ProviderResponse, TextProvider, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use service_core::clients::genai::{Content, InlineData, Part};
use std::time::Duration;

/// Fallback system instruction when the caller supplies none.
const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Generation over large inline documents can take minutes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Build the API URL for the configured model and the given method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(
        &self,
        contents: &[Content],
        system_prompt: Option<&str>,
        temperature: f32,
        response_schema: Option<&serde_json::Value>,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = GeminiGenerateRequest {
            contents: contents.iter().map(GeminiContent::from).collect(),
            system_instruction: Some(GeminiContent {
                parts: vec![GeminiPart::Text {
                    text: system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT).to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: response_schema.map(|_| "application/json".to_string()),
                response_json_schema: response_schema.cloned(),
            },
        };

        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            content_count = contents.len(),
            structured = response_schema.is_some(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GeminiGenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let usage = api_response.usage_metadata.unwrap_or_default();

        // An empty candidate list means the call "succeeded" without
        // producing anything usable; callers must see that as a failure.
        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ProviderResponse {
            content: candidate.content.into(),
            usage: TokenUsage {
                prompt_tokens: usage.prompt_token_count.unwrap_or(0),
                completion_tokens: usage.candidates_token_count.unwrap_or(0),
            },
        })
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_json_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}

impl From<&Content> for GeminiContent {
    fn from(content: &Content) -> Self {
        GeminiContent {
            parts: content
                .parts
                .iter()
                .map(|part| match part {
                    Part::Text { text } => GeminiPart::Text { text: text.clone() },
                    Part::InlineData { inline_data } => GeminiPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: inline_data.mime_type.clone(),
                            data: inline_data.data.clone(),
                        },
                    },
                })
                .collect(),
        }
    }
}

impl From<GeminiContent> for Content {
    fn from(content: GeminiContent) -> Self {
        Content {
            parts: content
                .parts
                .into_iter()
                .map(|part| match part {
                    GeminiPart::Text { text } => Part::Text { text },
                    GeminiPart::InlineData { inline_data } => Part::InlineData {
                        inline_data: InlineData {
                            mime_type: inline_data.mime_type,
                            data: inline_data.data,
                        },
                    },
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upstream_request_uses_camel_case_wire_names() {
        let request = GeminiGenerateRequest {
            contents: vec![(&Content::from_text("hi")).into()],
            system_instruction: None,
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: Some("application/json".to_string()),
                response_json_schema: Some(json!({"type": "array"})),
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseJsonSchema"]["type"], "array");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn inline_data_maps_to_upstream_casing() {
        let content = Content {
            parts: vec![Part::inline_data("application/pdf", "aGk=")],
        };
        let value = serde_json::to_value(GeminiContent::from(&content)).unwrap();
        assert_eq!(value["parts"][0]["inlineData"]["mimeType"], "application/pdf");
    }

    #[test]
    fn api_url_joins_base_model_and_method() {
        let provider = GeminiTextProvider::new(GeminiConfig {
            api_key: "k".to_string(),
            api_base: "http://localhost:9999/".to_string(),
            model: "gemini-test".to_string(),
        });
        assert_eq!(
            provider.api_url("generateContent"),
            "http://localhost:9999/models/gemini-test:generateContent"
        );
    }
}
