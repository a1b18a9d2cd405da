//! Track resolution stage with tiered query fallback
//!
//! Three query strategies run in a fixed order, each against the same
//! catalog search endpoint. The first tier that returns any tracks wins;
//! later tiers are never queried. HTTP failures abort resolution instead
//! of falling through to the next tier, so a degraded catalog cannot
//! silently produce generic playlists.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use moodmix_spotify_client::SpotifyClient;

use crate::error::{EngineError, EngineResult};
use crate::models::{CandidateTrack, MusicParameters};
use crate::pipeline::{scoring, PipelineStage};

/// How many genres a query draws from the recommendation list
const MAX_QUERY_GENRES: usize = 2;

/// Cap on mood descriptors appended by the descriptive tier
const MAX_DESCRIPTORS: usize = 5;

/// Hard cap the catalog places on a single search request
const MAX_FETCH_LIMIT: usize = 50;

/// Representative artists per genre, used by the rich tier to bias
/// search toward well-known catalog entries
const GENRE_ARTISTS: &[(&str, &[&str])] = &[
    ("pop", &["Taylor Swift", "Dua Lipa", "Ed Sheeran"]),
    ("dance", &["Calvin Harris", "David Guetta", "Avicii"]),
    ("rock", &["Coldplay", "Imagine Dragons", "Foo Fighters"]),
    ("hip-hop", &["Drake", "Kendrick Lamar", "Travis Scott"]),
    ("electronic", &["Daft Punk", "Odesza", "Flume"]),
    ("indie", &["Arctic Monkeys", "Tame Impala", "The 1975"]),
    ("r&b", &["The Weeknd", "SZA", "Frank Ocean"]),
    ("jazz", &["Norah Jones", "Gregory Porter", "Kamasi Washington"]),
    ("classical", &["Ludovico Einaudi", "Max Richter", "Yo-Yo Ma"]),
    ("acoustic", &["Jack Johnson", "Ben Howard", "Jose Gonzalez"]),
];

/// A single tier of the fallback ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStrategy {
    /// Genres plus representative artist names
    Rich,
    /// Genres plus mood adjectives derived from the feature targets
    Descriptive,
    /// Genres alone
    Generic,
}

impl QueryStrategy {
    /// Fallback order; resolution walks this front to back
    pub const ORDER: [QueryStrategy; 3] = [Self::Rich, Self::Descriptive, Self::Generic];

    /// Build the search query this tier sends to the catalog
    pub fn build_query(&self, params: &MusicParameters) -> String {
        let mut terms: Vec<String> = params
            .recommended_genres
            .iter()
            .take(MAX_QUERY_GENRES)
            .cloned()
            .collect();

        match self {
            Self::Rich => {
                for genre in params.recommended_genres.iter().take(MAX_QUERY_GENRES) {
                    if let Some((_, artists)) =
                        GENRE_ARTISTS.iter().find(|(name, _)| name == genre)
                    {
                        terms.extend(artists.iter().map(|a| a.to_string()));
                    }
                }
            }
            Self::Descriptive => {
                terms.extend(mood_descriptors(params));
            }
            Self::Generic => {}
        }

        terms.join(" ")
    }
}

impl std::fmt::Display for QueryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rich => write!(f, "rich"),
            Self::Descriptive => write!(f, "descriptive"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

/// Derive mood adjectives from feature targets, capped at
/// [`MAX_DESCRIPTORS`] terms
fn mood_descriptors(params: &MusicParameters) -> Vec<String> {
    let mut descriptors: Vec<&str> = Vec::new();

    if params.target_valence > 0.7 {
        descriptors.extend(["happy", "upbeat", "positive"]);
    } else if params.target_valence < 0.3 {
        descriptors.extend(["sad", "melancholic", "emotional"]);
    }

    if params.target_energy > 0.7 {
        descriptors.extend(["energetic", "high-energy", "powerful"]);
    } else if params.target_energy < 0.3 {
        descriptors.extend(["calm", "relaxing", "peaceful"]);
    }

    if params.target_tempo > 120.0 {
        descriptors.extend(["fast", "upbeat", "dance"]);
    } else if params.target_tempo < 80.0 {
        descriptors.extend(["slow", "chill", "ambient"]);
    }

    descriptors
        .into_iter()
        .take(MAX_DESCRIPTORS)
        .map(String::from)
        .collect()
}

/// Drop duplicate track ids, keeping first occurrence order
fn dedupe(tracks: Vec<CandidateTrack>) -> Vec<CandidateTrack> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}

/// Overwrite neutral features with catalog audio features where available
///
/// Enrichment is best-effort: a failed lookup logs a warning and leaves
/// every candidate at its neutral defaults.
async fn enrich(spotify: &SpotifyClient, candidates: &mut [CandidateTrack]) {
    let ids: Vec<String> = candidates.iter().map(|t| t.id.clone()).collect();

    let features = match spotify.audio_features(&ids).await {
        Ok(features) => features,
        Err(e) => {
            warn!(error = %e, "Audio-feature enrichment failed, scoring on neutral defaults");
            return;
        }
    };

    for (candidate, features) in candidates.iter_mut().zip(features.iter()) {
        if let Some(features) = features {
            candidate.apply_features(features);
        }
    }
}

/// Resolve candidate tracks for the given feature targets
///
/// Walks [`QueryStrategy::ORDER`], returning the first tier's tracks after
/// dedup, best-effort enrichment, scoring and truncation to `limit`. All
/// tiers empty yields `Ok(vec![])`; the caller decides what an empty
/// resolution means.
pub async fn resolve_tracks(
    spotify: &SpotifyClient,
    params: &MusicParameters,
    limit: usize,
) -> EngineResult<Vec<CandidateTrack>> {
    // Extra headroom so dedup and scoring have something to cut from
    let fetch_limit = limit.saturating_mul(2).min(MAX_FETCH_LIMIT).max(1) as u32;

    for strategy in QueryStrategy::ORDER {
        let query = strategy.build_query(params);

        debug!(strategy = %strategy, query = %query, fetch_limit, "Resolving tracks");

        let tracks = spotify
            .search_tracks(&query, fetch_limit)
            .await
            .map_err(|e| EngineError::from_spotify(PipelineStage::ResolvingTracks, e))?;

        if tracks.is_empty() {
            debug!(strategy = %strategy, "Tier returned no tracks, falling back");
            continue;
        }

        let mut candidates = dedupe(tracks.into_iter().map(Into::into).collect());

        enrich(spotify, &mut candidates).await;
        scoring::rank_tracks(&mut candidates, params);
        candidates.truncate(limit);

        info!(
            strategy = %strategy,
            track_count = candidates.len(),
            "Track resolution complete"
        );

        return Ok(candidates);
    }

    warn!("All resolution tiers returned no tracks");
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use moodmix_shared_config::SpotifyConfig;
    use moodmix_spotify_client::StaticTokenProvider;
    use moodmix_test_utils::{features_fixture, track_fixture, MockSpotifyServer};

    use crate::models::RawMusicPayload;

    fn test_client(url: &str) -> SpotifyClient {
        SpotifyClient::new(
            &SpotifyConfig::with_url(url),
            Arc::new(StaticTokenProvider::new("test-token")),
        )
        .unwrap()
        .with_max_retries(0)
    }

    fn dance_params() -> MusicParameters {
        MusicParameters::from_raw(RawMusicPayload {
            target_energy: Some(0.85),
            target_valence: Some(0.9),
            target_tempo: Some(128.0),
            recommended_genres: Some(vec!["pop".to_string(), "dance".to_string()]),
            ..Default::default()
        })
    }

    #[test]
    fn test_rich_query_includes_genre_artists() {
        let query = QueryStrategy::Rich.build_query(&dance_params());
        assert!(query.starts_with("pop dance"));
        assert!(query.contains("Taylor Swift"));
        assert!(query.contains("Calvin Harris"));
    }

    #[test]
    fn test_rich_query_unknown_genre_degrades_to_genres() {
        let params = MusicParameters::from_raw(RawMusicPayload {
            recommended_genres: Some(vec!["vaporwave".to_string()]),
            ..Default::default()
        });
        assert_eq!(QueryStrategy::Rich.build_query(&params), "vaporwave");
    }

    #[test]
    fn test_descriptive_query_caps_descriptors() {
        // High valence, high energy and fast tempo produce nine raw
        // descriptors; only five survive.
        let query = QueryStrategy::Descriptive.build_query(&dance_params());
        let terms: Vec<&str> = query.split(' ').collect();
        assert_eq!(terms.len(), 2 + MAX_DESCRIPTORS);
        assert!(query.contains("happy"));
        assert!(query.contains("energetic"));
    }

    #[test]
    fn test_descriptive_query_neutral_targets_add_nothing() {
        let params = MusicParameters::default();
        assert_eq!(QueryStrategy::Descriptive.build_query(&params), "pop");
    }

    #[test]
    fn test_generic_query_is_genres_only() {
        assert_eq!(QueryStrategy::Generic.build_query(&dance_params()), "pop dance");
    }

    #[test]
    fn test_query_uses_at_most_two_genres() {
        let params = MusicParameters::from_raw(RawMusicPayload {
            recommended_genres: Some(vec![
                "pop".to_string(),
                "rock".to_string(),
                "jazz".to_string(),
            ]),
            ..Default::default()
        });
        assert_eq!(QueryStrategy::Generic.build_query(&params), "pop rock");
    }

    #[tokio::test]
    async fn test_first_tier_hit_skips_later_tiers() {
        let server = MockSpotifyServer::start().await;
        let params = dance_params();

        server
            .mock_search_for_query(
                &QueryStrategy::Rich.build_query(&params),
                &[track_fixture("t1", "One", "A"), track_fixture("t2", "Two", "B")],
            )
            .await;
        server
            .mock_audio_features(&[
                features_fixture("t1", 0.8, 0.9, 128.0),
                features_fixture("t2", 0.3, 0.2, 70.0),
            ])
            .await;

        let client = test_client(&server.url());
        let tracks = resolve_tracks(&client, &params, 20).await.unwrap();

        assert_eq!(tracks.len(), 2);
        // Closer feature match ranks first
        assert_eq!(tracks[0].id, "t1");
        assert_eq!(server.requests_with_path_prefix("/v1/search").await, 1);
    }

    #[tokio::test]
    async fn test_empty_tier_falls_back_in_order() {
        let server = MockSpotifyServer::start().await;
        let params = dance_params();

        server
            .mock_search_empty_for_query(&QueryStrategy::Rich.build_query(&params))
            .await;
        server
            .mock_search_for_query(
                &QueryStrategy::Descriptive.build_query(&params),
                &[track_fixture("t3", "Three", "C")],
            )
            .await;
        server.mock_audio_features(&[]).await;

        let client = test_client(&server.url());
        let tracks = resolve_tracks(&client, &params, 20).await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "t3");
        // Rich then descriptive; generic never queried
        assert_eq!(server.requests_with_path_prefix("/v1/search").await, 2);
    }

    #[tokio::test]
    async fn test_all_tiers_empty_is_ok_empty() {
        let server = MockSpotifyServer::start().await;
        server.mock_search_any(&[]).await;

        let client = test_client(&server.url());
        let tracks = resolve_tracks(&client, &dance_params(), 20).await.unwrap();

        assert!(tracks.is_empty());
        assert_eq!(server.requests_with_path_prefix("/v1/search").await, 3);
    }

    #[tokio::test]
    async fn test_search_failure_aborts_without_fallback() {
        let server = MockSpotifyServer::start().await;
        server.mock_search_failure(500).await;

        let client = test_client(&server.url());
        let result = resolve_tracks(&client, &dance_params(), 20).await;

        assert!(result.is_err());
        // The failing tier is not retried with a different query
        assert_eq!(server.requests_with_path_prefix("/v1/search").await, 1);
    }

    #[tokio::test]
    async fn test_search_rejection_is_resolution_error() {
        let server = MockSpotifyServer::start().await;
        server.mock_search_failure(403).await;

        let client = test_client(&server.url());
        let result = resolve_tracks(&client, &dance_params(), 20).await;

        assert!(matches!(result, Err(EngineError::Resolution(_))));
    }

    #[tokio::test]
    async fn test_enrichment_failure_keeps_neutral_defaults() {
        let server = MockSpotifyServer::start().await;
        server
            .mock_search_any(&[track_fixture("t1", "One", "A")])
            .await;
        server.mock_audio_features_failure(500).await;

        let client = test_client(&server.url());
        let tracks = resolve_tracks(&client, &dance_params(), 20).await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert!((tracks[0].energy - 0.5).abs() < f64::EPSILON);
        assert!((tracks[0].tempo - 120.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_duplicate_tracks_deduped_preserving_order() {
        let server = MockSpotifyServer::start().await;
        server
            .mock_search_any(&[
                track_fixture("t1", "One", "A"),
                track_fixture("t2", "Two", "B"),
                track_fixture("t1", "One", "A"),
            ])
            .await;
        server.mock_audio_features(&[]).await;

        let client = test_client(&server.url());
        let tracks = resolve_tracks(&client, &dance_params(), 20).await.unwrap();

        let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_huge_limit_caps_fetch_size() {
        let server = MockSpotifyServer::start().await;
        server
            .mock_search_any(&[track_fixture("t1", "One", "A")])
            .await;
        server.mock_audio_features(&[]).await;

        let client = test_client(&server.url());
        let tracks = resolve_tracks(&client, &dance_params(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(tracks.len(), 1);
        let requests = server.inner().received_requests().await.unwrap();
        let search = requests
            .iter()
            .find(|r| r.url.path() == "/v1/search")
            .unwrap();
        let limit_param = search
            .url
            .query_pairs()
            .find(|(k, _)| k == "limit")
            .map(|(_, v)| v.to_string())
            .unwrap();
        assert_eq!(limit_param, "50");
    }

    #[tokio::test]
    async fn test_results_truncated_to_limit() {
        let server = MockSpotifyServer::start().await;
        let items: Vec<serde_json::Value> = (0..10)
            .map(|i| track_fixture(&format!("t{}", i), "Song", "Artist"))
            .collect();
        server.mock_search_any(&items).await;
        server.mock_audio_features(&[]).await;

        let client = test_client(&server.url());
        let tracks = resolve_tracks(&client, &dance_params(), 5).await.unwrap();

        assert_eq!(tracks.len(), 5);
    }
}
