//! Domain model for the mood-to-playlist pipeline
//!
//! Model responses arrive as loosely-typed JSON (`RawMoodPayload`,
//! `RawMusicPayload`); the validating constructors on [`MoodAnalysis`] and
//! [`MusicParameters`] fill defaults and clamp every numeric field into its
//! documented range, so downstream stages never see an out-of-range value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use moodmix_spotify_client::{AudioFeatures, Track};

/// Fallback genre when the model names none
pub const DEFAULT_GENRE: &str = "pop";

/// Neutral value for unit-interval audio features
pub const NEUTRAL_FEATURE: f64 = 0.5;

/// Neutral tempo in beats per minute
pub const NEUTRAL_TEMPO: f64 = 120.0;

/// Coarse tempo feel reported by mood analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tempo {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Tempo {
    /// Parse a tempo label leniently; unrecognized labels fall back to Medium
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "slow" => Self::Slow,
            "fast" => Self::Fast,
            _ => Self::Medium,
        }
    }
}

/// Clamp a unit-interval value, replacing non-finite input with `default`
pub(crate) fn clamp_unit(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        default
    }
}

/// Clamp a target tempo into the supported BPM range
pub(crate) fn clamp_tempo(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(60.0, 200.0)
    } else {
        NEUTRAL_TEMPO
    }
}

fn sanitize_genres(genres: Option<Vec<String>>) -> Vec<String> {
    let cleaned: Vec<String> = genres
        .unwrap_or_default()
        .into_iter()
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty())
        .collect();

    if cleaned.is_empty() {
        vec![DEFAULT_GENRE.to_string()]
    } else {
        cleaned
    }
}

/// Mood-analysis payload exactly as the model emits it
///
/// Every field is optional; the model routinely omits keys or returns
/// out-of-range numbers, so validation happens in [`MoodAnalysis::from_raw`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMoodPayload {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub intensity: Option<f64>,
    #[serde(default)]
    pub valence: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub tempo: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Validated mood analysis produced by the interpreter stage
#[derive(Debug, Clone, Serialize)]
pub struct MoodAnalysis {
    /// Primary mood label (lowercased)
    pub mood: String,
    /// Mood intensity on a 1..=10 scale
    pub intensity: u8,
    /// Musical positiveness, 0.0 to 1.0
    pub valence: f64,
    /// Perceived energy, 0.0 to 1.0
    pub energy: f64,
    /// Coarse tempo feel
    pub tempo: Tempo,
    /// Suggested genres (never empty)
    pub genres: Vec<String>,
    /// Listening context, e.g. "workout" or "general"
    pub context: String,
    /// One-sentence description of the mood
    pub description: String,
}

impl MoodAnalysis {
    /// Build a validated analysis from a raw model payload
    pub fn from_raw(raw: RawMoodPayload) -> Self {
        let mood = raw
            .mood
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "neutral".to_string());

        let intensity = raw
            .intensity
            .filter(|i| i.is_finite())
            .map(|i| (i.round() as i64).clamp(1, 10) as u8)
            .unwrap_or(5);

        Self {
            intensity,
            valence: clamp_unit(raw.valence.unwrap_or(NEUTRAL_FEATURE), NEUTRAL_FEATURE),
            energy: clamp_unit(raw.energy.unwrap_or(NEUTRAL_FEATURE), NEUTRAL_FEATURE),
            tempo: raw
                .tempo
                .map(|t| Tempo::from_label(&t))
                .unwrap_or_default(),
            genres: sanitize_genres(raw.genres),
            context: raw
                .context
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "general".to_string()),
            description: raw.description.unwrap_or_else(|| format!("A {} mood", mood)),
            mood,
        }
    }
}

impl Default for MoodAnalysis {
    fn default() -> Self {
        Self::from_raw(RawMoodPayload::default())
    }
}

/// Parameter-mapping payload exactly as the model emits it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMusicPayload {
    #[serde(default)]
    pub target_energy: Option<f64>,
    #[serde(default)]
    pub target_valence: Option<f64>,
    #[serde(default)]
    pub target_tempo: Option<f64>,
    #[serde(default)]
    pub target_danceability: Option<f64>,
    #[serde(default)]
    pub target_acousticness: Option<f64>,
    #[serde(default)]
    pub target_instrumentalness: Option<f64>,
    #[serde(default)]
    pub recommended_genres: Option<Vec<String>>,
    #[serde(default)]
    pub mood_description: Option<String>,
    #[serde(default)]
    pub playlist_theme: Option<String>,
}

/// Validated audio-feature targets produced by the mapper stage
#[derive(Debug, Clone, Serialize)]
pub struct MusicParameters {
    /// Target energy, 0.0 to 1.0
    pub target_energy: f64,
    /// Target valence, 0.0 to 1.0
    pub target_valence: f64,
    /// Target tempo in BPM, 60.0 to 200.0
    pub target_tempo: f64,
    /// Target danceability, 0.0 to 1.0
    pub target_danceability: f64,
    /// Target acousticness, 0.0 to 1.0
    pub target_acousticness: f64,
    /// Target instrumentalness, 0.0 to 1.0
    pub target_instrumentalness: f64,
    /// Genres to steer track search (never empty)
    pub recommended_genres: Vec<String>,
    /// Short description of the intended feel
    pub mood_description: String,
    /// Display name for the generated playlist
    pub playlist_theme: String,
}

impl MusicParameters {
    /// Build validated parameters from a raw model payload
    pub fn from_raw(raw: RawMusicPayload) -> Self {
        Self {
            target_energy: clamp_unit(raw.target_energy.unwrap_or(NEUTRAL_FEATURE), NEUTRAL_FEATURE),
            target_valence: clamp_unit(raw.target_valence.unwrap_or(NEUTRAL_FEATURE), NEUTRAL_FEATURE),
            target_tempo: clamp_tempo(raw.target_tempo.unwrap_or(NEUTRAL_TEMPO)),
            target_danceability: clamp_unit(
                raw.target_danceability.unwrap_or(NEUTRAL_FEATURE),
                NEUTRAL_FEATURE,
            ),
            target_acousticness: clamp_unit(
                raw.target_acousticness.unwrap_or(NEUTRAL_FEATURE),
                NEUTRAL_FEATURE,
            ),
            target_instrumentalness: clamp_unit(
                raw.target_instrumentalness.unwrap_or(NEUTRAL_FEATURE),
                NEUTRAL_FEATURE,
            ),
            recommended_genres: sanitize_genres(raw.recommended_genres),
            mood_description: raw
                .mood_description
                .unwrap_or_else(|| "A mood-matched selection".to_string()),
            playlist_theme: raw
                .playlist_theme
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Mood-based Playlist".to_string()),
        }
    }
}

impl Default for MusicParameters {
    fn default() -> Self {
        Self::from_raw(RawMusicPayload::default())
    }
}

/// A catalog track carried through resolution, scoring and materialization
///
/// Audio features start at neutral values and are overwritten when
/// enrichment succeeds; scoring works either way.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub uri: String,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub danceability: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
}

impl From<Track> for CandidateTrack {
    fn from(track: Track) -> Self {
        Self {
            id: track.id,
            name: track.name,
            artist: track.artist,
            album: track.album,
            uri: track.uri,
            energy: NEUTRAL_FEATURE,
            valence: NEUTRAL_FEATURE,
            tempo: NEUTRAL_TEMPO,
            danceability: NEUTRAL_FEATURE,
            acousticness: NEUTRAL_FEATURE,
            instrumentalness: NEUTRAL_FEATURE,
        }
    }
}

impl CandidateTrack {
    /// Overwrite neutral features with catalog audio features
    pub fn apply_features(&mut self, features: &AudioFeatures) {
        self.energy = clamp_unit(features.energy, NEUTRAL_FEATURE);
        self.valence = clamp_unit(features.valence, NEUTRAL_FEATURE);
        self.tempo = if features.tempo.is_finite() && features.tempo > 0.0 {
            features.tempo
        } else {
            NEUTRAL_TEMPO
        };
        self.danceability = clamp_unit(features.danceability, NEUTRAL_FEATURE);
        self.acousticness = clamp_unit(features.acousticness, NEUTRAL_FEATURE);
        self.instrumentalness = clamp_unit(features.instrumentalness, NEUTRAL_FEATURE);
    }
}

/// Fully assembled playlist, returned by the pipeline on success
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPlaylist {
    /// Playlist display name (the mapper's theme)
    pub name: String,
    /// Playlist description shown in the catalog
    pub description: String,
    /// Tracks in final (score-descending) order
    pub tracks: Vec<CandidateTrack>,
    /// The mood analysis this playlist was generated from
    pub mood: MoodAnalysis,
    /// The audio-feature targets used for scoring
    pub parameters: MusicParameters,
    /// Catalog id of the created playlist
    pub spotify_playlist_id: Option<String>,
}

impl GeneratedPlaylist {
    /// Produce a compact summary for display and persistence
    pub fn summary(&self) -> PlaylistSummary {
        PlaylistSummary {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            description: self.description.clone(),
            track_count: self.tracks.len(),
            mood: self.mood.mood.clone(),
            happiness_level: (self.mood.valence * 100.0).round() as u8,
            spotify_playlist_id: self.spotify_playlist_id.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Compact playlist record for display and persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub track_count: usize,
    pub mood: String,
    /// Valence expressed as a 0..=100 percentage
    pub happiness_level: u8,
    pub spotify_playlist_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
