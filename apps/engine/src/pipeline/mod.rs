//! The mood-to-playlist generation pipeline
//!
//! [`PlaylistEngine::generate`] runs four stages strictly in order: mood
//! analysis, parameter mapping, track resolution, materialization. A stage
//! failure aborts the run immediately; stages never retry each other and
//! the pipeline never re-enters an earlier stage. Transport-level retries
//! live inside the service clients, on idempotent requests only.

pub mod interpreter;
pub mod mapper;
pub mod materializer;
pub mod resolver;
pub mod scoring;

use std::fmt;

use tracing::{info, instrument};

use moodmix_gemini_client::GeminiClient;
use moodmix_spotify_client::SpotifyClient;

use crate::error::{EngineError, EngineResult};
use crate::models::{GeneratedPlaylist, MoodAnalysis, MusicParameters};

/// Default number of tracks in a generated playlist
pub const DEFAULT_TRACK_LIMIT: usize = 20;

/// The states a generation run moves through, in order
///
/// Runs are linear: `Idle` through `Done` with no branching back. The
/// four working states attribute errors and structure the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    AnalyzingMood,
    MappingParameters,
    ResolvingTracks,
    Materializing,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AnalyzingMood => write!(f, "mood analysis"),
            Self::MappingParameters => write!(f, "parameter mapping"),
            Self::ResolvingTracks => write!(f, "track resolution"),
            Self::Materializing => write!(f, "materialization"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// A single playlist generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Preselected mood label, e.g. "happy"
    pub mood_label: Option<String>,
    /// Free-form mood description; preferred over the label when both
    /// are present
    pub free_text: Option<String>,
    /// Catalog user who will own the playlist
    pub owner_id: String,
    /// Maximum number of tracks in the playlist
    pub limit: usize,
}

impl GenerateRequest {
    /// Create a request for `owner_id` with the default track limit
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            mood_label: None,
            free_text: None,
            owner_id: owner_id.into(),
            limit: DEFAULT_TRACK_LIMIT,
        }
    }

    /// Set a preselected mood label
    pub fn with_mood_label(mut self, label: impl Into<String>) -> Self {
        self.mood_label = Some(label.into());
        self
    }

    /// Set a free-form mood description
    pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = Some(text.into());
        self
    }

    /// Set the maximum number of tracks
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// The mood text handed to the interpreter
    fn mood_text(&self) -> Option<&str> {
        self.free_text
            .as_deref()
            .or(self.mood_label.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// The playlist generation engine
///
/// Cheap to clone; both service clients share pooled HTTP connections.
#[derive(Debug, Clone)]
pub struct PlaylistEngine {
    gemini: GeminiClient,
    spotify: SpotifyClient,
    public_playlists: bool,
}

impl PlaylistEngine {
    /// Create an engine from configured service clients
    pub fn new(gemini: GeminiClient, spotify: SpotifyClient) -> Self {
        let public_playlists = spotify.config().public_playlists;
        Self {
            gemini,
            spotify,
            public_playlists,
        }
    }

    /// Run the full pipeline for one request
    ///
    /// Returns the assembled playlist with its catalog id filled in, or
    /// the first stage error encountered.
    #[instrument(skip(self, request), fields(owner = %request.owner_id, limit = request.limit))]
    pub async fn generate(&self, request: &GenerateRequest) -> EngineResult<GeneratedPlaylist> {
        let mood_text = request.mood_text().ok_or_else(|| {
            EngineError::InvalidInput(
                "a mood label or free-text description is required".to_string(),
            )
        })?;
        if request.owner_id.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "owner id cannot be empty".to_string(),
            ));
        }
        if request.limit == 0 {
            return Err(EngineError::InvalidInput(
                "track limit must be at least 1".to_string(),
            ));
        }

        info!(stage = %PipelineStage::AnalyzingMood, "Starting playlist generation");
        let mood = interpreter::analyze_mood(&self.gemini, mood_text).await?;

        info!(stage = %PipelineStage::MappingParameters, mood = %mood.mood, "Mood analyzed");
        let parameters = mapper::map_parameters(&self.gemini, &mood).await?;

        info!(
            stage = %PipelineStage::ResolvingTracks,
            theme = %parameters.playlist_theme,
            "Parameters mapped"
        );
        let tracks = resolver::resolve_tracks(&self.spotify, &parameters, request.limit).await?;
        if tracks.is_empty() {
            return Err(EngineError::NoTracksFound);
        }

        info!(
            stage = %PipelineStage::Materializing,
            track_count = tracks.len(),
            "Tracks resolved"
        );
        let mut playlist = GeneratedPlaylist {
            name: parameters.playlist_theme.clone(),
            description: compose_description(&mood, &parameters),
            tracks,
            mood,
            parameters,
            spotify_playlist_id: None,
        };

        let playlist_id = materializer::materialize(
            &self.spotify,
            &playlist,
            &request.owner_id,
            self.public_playlists,
            request.limit,
        )
        .await?;
        playlist.spotify_playlist_id = Some(playlist_id);

        info!(
            stage = %PipelineStage::Done,
            playlist_id = ?playlist.spotify_playlist_id,
            track_count = playlist.tracks.len(),
            "Playlist generation complete"
        );

        Ok(playlist)
    }
}

/// Build the playlist description shown in the catalog
fn compose_description(mood: &MoodAnalysis, parameters: &MusicParameters) -> String {
    format!(
        "{}. Generated for a {} mood ({} listening).",
        parameters.mood_description.trim().trim_end_matches('.'),
        mood.mood,
        mood.context
    )
}
