//! Gemini text-generation configuration types

use crate::{get_env_or_default, get_required_env, parse_env, ConfigResult};

/// Gemini generative-text service configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL
    pub api_url: String,

    /// API key (sent as a query credential)
    pub api_key: String,

    /// Model name (e.g., gemini-1.5-flash)
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum output tokens per generation
    pub max_output_tokens: u32,

    /// Temperature for generation (0.0 - 1.0)
    pub temperature: f32,
}

impl GeminiConfig {
    /// Load Gemini configuration from environment variables
    ///
    /// `GEMINI_API_KEY` is required; everything else has defaults.
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            api_url: get_env_or_default(
                "GEMINI_API_URL",
                "https://generativelanguage.googleapis.com",
            ),
            api_key: get_required_env("GEMINI_API_KEY")?,
            model: get_env_or_default("GEMINI_MODEL", "gemini-1.5-flash"),
            timeout_secs: parse_env("GEMINI_TIMEOUT", 30)?,
            max_output_tokens: parse_env("GEMINI_MAX_OUTPUT_TOKENS", 1024)?,
            temperature: parse_env("GEMINI_TEMPERATURE", 0.7)?,
        })
    }

    /// Create a configuration with a custom base URL (useful for testing)
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: "test-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 30,
            max_output_tokens: 1024,
            temperature: 0.7,
        }
    }

    /// Get the model-specific generateContent endpoint URL
    ///
    /// The API key is appended as a query parameter by the client, not here,
    /// so this URL is safe to log.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}
