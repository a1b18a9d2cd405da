//! Request and response types for the Gemini generateContent API

use serde::{Deserialize, Serialize};

/// Request body for generateContent
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Prompt contents
    pub contents: Vec<Content>,
    /// Generation parameters
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Build a single-turn request from a prompt string
    pub fn from_prompt(prompt: impl Into<String>, config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
            generation_config: config,
        }
    }
}

/// A content block (one turn of the conversation)
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    /// Content parts
    pub parts: Vec<Part>,
}

/// A text part within a content block
#[derive(Debug, Clone, Serialize)]
pub struct Part {
    /// Text payload
    pub text: String,
}

/// Generation parameters
#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    /// Sampling temperature (0.0 - 1.0)
    pub temperature: f32,
    /// Maximum output tokens
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

/// Response body from generateContent
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates (usually exactly one)
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// A single generation candidate
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// Candidate content
    pub content: Option<CandidateContent>,
    /// Why generation stopped
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    /// Content parts
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

/// A part of candidate content
#[derive(Debug, Clone, Deserialize)]
pub struct CandidatePart {
    /// Text payload, if this part is textual
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Extract the first non-empty text part of the first candidate
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .find(|t| !t.is_empty())
    }
}
