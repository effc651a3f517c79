use serde::Deserialize;
use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub document_service: DocumentServiceConfig,
    pub genai_service: GenaiServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentServiceConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenaiServiceConfig {
    pub base_url: String,
}

impl ChatConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(ChatConfig {
            common,
            document_service: DocumentServiceConfig {
                base_url: get_env("DOCUMENT_SERVICE_URL", Some("http://document-service"))?,
            },
            genai_service: GenaiServiceConfig {
                base_url: get_env("GENAI_SERVICE_URL", Some("http://genai-service"))?,
            },
        })
    }
}
