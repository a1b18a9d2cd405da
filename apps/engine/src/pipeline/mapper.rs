//! Parameter mapping stage
//!
//! Second model round-trip: turns a validated [`MoodAnalysis`] into
//! concrete audio-feature targets for track resolution and scoring.

use tracing::{debug, warn};

use moodmix_gemini_client::GeminiClient;

use crate::error::{EngineError, EngineResult};
use crate::extract;
use crate::models::{MoodAnalysis, MusicParameters, RawMusicPayload};
use crate::pipeline::PipelineStage;

/// Prompt template for parameter mapping
const PARAMS_PROMPT: &str = "\
You are a music parameter mapper. Translate the mood analysis below into \
audio-feature targets for a streaming catalog. Respond with a single JSON \
object, no other text, in exactly this shape:

{
  \"target_energy\": 0.0-1.0,
  \"target_valence\": 0.0-1.0,
  \"target_tempo\": 60.0-200.0,
  \"target_danceability\": 0.0-1.0,
  \"target_acousticness\": 0.0-1.0,
  \"target_instrumentalness\": 0.0-1.0,
  \"recommended_genres\": [\"up to three genre names\"],
  \"mood_description\": \"short description of the intended feel\",
  \"playlist_theme\": \"a catchy playlist name\"
}";

/// Map a mood analysis to audio-feature targets
pub async fn map_parameters(
    gemini: &GeminiClient,
    mood: &MoodAnalysis,
) -> EngineResult<MusicParameters> {
    let mood_json =
        serde_json::to_string_pretty(mood).map_err(|e| EngineError::Mapping(e.to_string()))?;

    let prompt = format!("{}\n\nMood analysis:\n{}", PARAMS_PROMPT, mood_json);

    let response = gemini
        .generate_content(&prompt)
        .await
        .map_err(|e| EngineError::from_gemini(PipelineStage::MappingParameters, e))?;

    let raw: RawMusicPayload = extract::parse_json_block(&response).map_err(|e| {
        warn!(error = %e, "Parameter mapping response had no usable payload");
        EngineError::Mapping(e.to_string())
    })?;

    let params = MusicParameters::from_raw(raw);

    debug!(
        target_energy = params.target_energy,
        target_valence = params.target_valence,
        target_tempo = params.target_tempo,
        theme = %params.playlist_theme,
        genres = ?params.recommended_genres,
        "Parameter mapping complete"
    );

    Ok(params)
}
