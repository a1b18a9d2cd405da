//! Moodmix playlist generation engine
//!
//! Turns a free-form mood description into a materialized streaming
//! playlist through a linear pipeline:
//!
//! 1. Mood analysis: a text model interprets the description
//! 2. Parameter mapping: the analysis becomes audio-feature targets
//! 3. Track resolution: tiered catalog searches with score ranking
//! 4. Materialization: playlist creation and batch track addition
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use moodmix_engine::{GenerateRequest, PlaylistEngine};
//! use moodmix_gemini_client::GeminiClient;
//! use moodmix_shared_config::{GeminiConfig, SpotifyConfig};
//! use moodmix_spotify_client::{SpotifyClient, StaticTokenProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gemini = GeminiClient::new(&GeminiConfig::from_env()?)?;
//! let spotify = SpotifyClient::new(
//!     &SpotifyConfig::from_env()?,
//!     Arc::new(StaticTokenProvider::new("access-token")),
//! )?;
//!
//! let engine = PlaylistEngine::new(gemini, spotify);
//! let request = GenerateRequest::new("user42").with_free_text("rainy sunday afternoon");
//! let playlist = engine.generate(&request).await?;
//! println!("{} tracks in '{}'", playlist.tracks.len(), playlist.name);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;

pub use config::Config;
pub use error::{EngineError, EngineResult};
pub use models::{
    CandidateTrack, GeneratedPlaylist, MoodAnalysis, MusicParameters, PlaylistSummary, Tempo,
};
pub use pipeline::{GenerateRequest, PipelineStage, PlaylistEngine, DEFAULT_TRACK_LIMIT};
