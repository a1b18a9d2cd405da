//! Error handling for the playlist generation pipeline
//!
//! Every failure surfaced by [`crate::pipeline::PlaylistEngine::generate`]
//! is an [`EngineError`], attributed to the pipeline stage that produced it.
//! Stages never retry each other and never re-enter earlier stages; an error
//! aborts the run as-is.

use thiserror::Error;

use moodmix_gemini_client::GeminiError;
use moodmix_spotify_client::SpotifyError;

use crate::pipeline::PipelineStage;

/// Pipeline error with stage attribution
#[derive(Error, Debug)]
pub enum EngineError {
    /// Request was rejected before the pipeline started
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No valid catalog credential was available
    #[error("catalog authentication failed: no valid access token")]
    Auth,

    /// Mood analysis produced no usable payload
    #[error("mood analysis failed: {0}")]
    Analysis(String),

    /// Parameter mapping produced no usable payload
    #[error("parameter mapping failed: {0}")]
    Mapping(String),

    /// Every resolution tier came back empty
    #[error("no tracks found for the requested mood")]
    NoTracksFound,

    /// The catalog rejected a resolution request outright
    #[error("track resolution failed: {0}")]
    Resolution(String),

    /// Playlist creation or track addition failed
    #[error("playlist materialization failed: {0}")]
    Materialization(String),

    /// Transient transport failure that exhausted its retries
    #[error("network failure during {stage}: {message}")]
    Network {
        stage: PipelineStage,
        message: String,
    },
}

impl EngineError {
    /// The pipeline stage this error is attributed to, if any
    ///
    /// Input validation and credential failures are not tied to a single
    /// stage and return `None`.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Analysis(_) => Some(PipelineStage::AnalyzingMood),
            Self::Mapping(_) => Some(PipelineStage::MappingParameters),
            Self::NoTracksFound | Self::Resolution(_) => Some(PipelineStage::ResolvingTracks),
            Self::Materialization(_) => Some(PipelineStage::Materializing),
            Self::Network { stage, .. } => Some(*stage),
            Self::InvalidInput(_) | Self::Auth => None,
        }
    }

    /// Attribute a text-generation client error to a pipeline stage
    pub fn from_gemini(stage: PipelineStage, err: GeminiError) -> Self {
        let message = err.to_string();
        if err.is_retryable() {
            return Self::Network { stage, message };
        }
        match stage {
            PipelineStage::MappingParameters => Self::Mapping(message),
            _ => Self::Analysis(message),
        }
    }

    /// Attribute a catalog client error to a pipeline stage
    pub fn from_spotify(stage: PipelineStage, err: SpotifyError) -> Self {
        let message = err.to_string();
        match err {
            SpotifyError::MissingToken | SpotifyError::Api { status: 401, .. } => Self::Auth,
            SpotifyError::InvalidInput(m) => Self::InvalidInput(m),
            e if e.is_retryable() => Self::Network { stage, message },
            // Permanent API rejections carry the failing stage, not the
            // transport
            _ => match stage {
                PipelineStage::Materializing => Self::Materialization(message),
                PipelineStage::ResolvingTracks => Self::Resolution(message),
                _ => Self::Network { stage, message },
            },
        }
    }
}

/// Result type alias for pipeline operations
pub type EngineResult<T> = Result<T, EngineError>;
