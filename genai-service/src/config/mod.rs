use serde::Deserialize;
use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;
use std::env;

/// Default Gemini REST endpoint.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for TEXT and STRUCTURED_JSON output.
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash-lite";

#[derive(Debug, Clone, Deserialize)]
pub struct GenaiConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// May be empty: the service then starts in degraded mode and announces
    /// it via the health endpoint instead of refusing to boot.
    pub api_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub text_model: String,
}

impl GenaiConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(GenaiConfig {
            common,
            google: GoogleConfig {
                api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_API_BASE))?,
            },
            models: ModelConfig {
                text_model: get_env("GENAI_TEXT_MODEL", Some(DEFAULT_TEXT_MODEL))?,
            },
        })
    }
}
