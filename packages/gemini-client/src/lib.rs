//! Gemini API client for Moodmix AI features
//!
//! This crate provides a client for the generateContent endpoint of a
//! Gemini-style text-generation service. The model responds with free-form
//! text that may wrap a structured JSON payload in prose; this client hands
//! that text back verbatim and leaves payload extraction to the caller.
//!
//! # Thread Safety
//!
//! `GeminiClient` is `Clone + Send + Sync` and can be safely shared across
//! tasks. It uses a shared HTTP client connection pool.
//!
//! # Example
//!
//! ```no_run
//! use moodmix_gemini_client::GeminiClient;
//! use moodmix_shared_config::GeminiConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeminiConfig::from_env()?;
//! let client = GeminiClient::new(&config)?;
//!
//! let text = client.generate_content("Describe the mood 'rainy sunday'").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::GeminiClient;
pub use error::{GeminiError, GeminiResult};
pub use models::{
    Candidate, CandidateContent, CandidatePart, Content, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part,
};
