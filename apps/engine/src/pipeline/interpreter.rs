//! Mood interpretation stage
//!
//! Turns a free-form mood description into a validated [`MoodAnalysis`] by
//! prompting the text model for a structured payload and extracting the
//! first JSON object from whatever prose comes back.

use tracing::{debug, warn};

use moodmix_gemini_client::GeminiClient;

use crate::error::{EngineError, EngineResult};
use crate::extract;
use crate::models::{MoodAnalysis, RawMoodPayload};
use crate::pipeline::PipelineStage;

/// Prompt template for mood analysis
///
/// The model is told the exact JSON shape and the allowed tempo labels;
/// it still wraps answers in prose often enough that extraction stays
/// lenient.
const MOOD_PROMPT: &str = "\
You are a music mood interpreter. Analyze the listener's mood description \
and respond with a single JSON object, no other text, in exactly this shape:

{
  \"mood\": \"one word, e.g. happy, sad, energetic, calm, romantic, angry, nostalgic, focused\",
  \"intensity\": 1-10,
  \"valence\": 0.0-1.0,
  \"energy\": 0.0-1.0,
  \"tempo\": \"slow\" | \"medium\" | \"fast\",
  \"genres\": [\"up to three genre names\"],
  \"context\": \"listening context, e.g. workout, study, party, general\",
  \"description\": \"one sentence describing the mood\"
}";

/// Analyze a mood description into validated mood attributes
pub async fn analyze_mood(gemini: &GeminiClient, mood_text: &str) -> EngineResult<MoodAnalysis> {
    let prompt = format!(
        "{}\n\nListener's mood description: {}",
        MOOD_PROMPT,
        mood_text.trim()
    );

    let response = gemini
        .generate_content(&prompt)
        .await
        .map_err(|e| EngineError::from_gemini(PipelineStage::AnalyzingMood, e))?;

    let raw: RawMoodPayload = extract::parse_json_block(&response).map_err(|e| {
        warn!(error = %e, "Mood analysis response had no usable payload");
        EngineError::Analysis(e.to_string())
    })?;

    let analysis = MoodAnalysis::from_raw(raw);

    debug!(
        mood = %analysis.mood,
        intensity = analysis.intensity,
        valence = analysis.valence,
        energy = analysis.energy,
        genres = ?analysis.genres,
        "Mood analysis complete"
    );

    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use moodmix_shared_config::GeminiConfig;
    use moodmix_test_utils::MockGeminiServer;
    use serde_json::json;

    fn test_client(url: &str) -> GeminiClient {
        GeminiClient::new(&GeminiConfig::with_url(url))
            .unwrap()
            .with_retry_config(0, 1)
    }

    #[tokio::test]
    async fn test_analyze_mood_parses_prose_wrapped_payload() {
        let server = MockGeminiServer::start().await;
        server
            .mock_generate_json_with_prose(
                "mood interpreter",
                json!({
                    "mood": "Happy",
                    "intensity": 8,
                    "valence": 0.9,
                    "energy": 0.85,
                    "tempo": "fast",
                    "genres": ["pop", "dance"],
                    "context": "party",
                    "description": "An upbeat celebratory mood"
                }),
            )
            .await;

        let client = test_client(&server.url());
        let analysis = analyze_mood(&client, "I feel amazing today!").await.unwrap();

        assert_eq!(analysis.mood, "happy");
        assert_eq!(analysis.intensity, 8);
        assert_eq!(analysis.genres, vec!["pop", "dance"]);
        assert_eq!(analysis.context, "party");
    }

    #[tokio::test]
    async fn test_analyze_mood_fills_defaults_for_sparse_payload() {
        let server = MockGeminiServer::start().await;
        server
            .mock_generate_success(r#"{"mood": "calm"}"#)
            .await;

        let client = test_client(&server.url());
        let analysis = analyze_mood(&client, "quiet evening").await.unwrap();

        assert_eq!(analysis.mood, "calm");
        assert_eq!(analysis.intensity, 5);
        assert_eq!(analysis.genres, vec!["pop"]);
    }

    #[tokio::test]
    async fn test_analyze_mood_prose_only_is_analysis_error() {
        let server = MockGeminiServer::start().await;
        server.mock_generate_prose_only().await;

        let client = test_client(&server.url());
        let result = analyze_mood(&client, "hmm").await;

        assert_matches!(result, Err(EngineError::Analysis(_)));
    }

    #[tokio::test]
    async fn test_analyze_mood_api_error_is_analysis_error() {
        let server = MockGeminiServer::start().await;
        server.mock_generate_failure(400, "bad request").await;

        let client = test_client(&server.url());
        let result = analyze_mood(&client, "hmm").await;

        assert_matches!(result, Err(EngineError::Analysis(_)));
    }
}
