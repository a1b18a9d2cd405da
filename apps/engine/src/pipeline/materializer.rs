//! Playlist materialization stage
//!
//! Creates the remote playlist, then adds tracks in a single batch call.
//! Neither call is retried and a failed track addition does not delete the
//! playlist created moments earlier; the error names the orphaned playlist
//! so a caller or operator can clean it up.

use tracing::{debug, info};

use moodmix_spotify_client::{CreatePlaylistRequest, SpotifyClient, SpotifyError};

use crate::error::{EngineError, EngineResult};
use crate::models::GeneratedPlaylist;
use crate::pipeline::PipelineStage;

/// Materialize a generated playlist in the catalog
///
/// Returns the catalog id of the created playlist. At most `limit` track
/// uris are added, in the playlist's (score-descending) order.
pub async fn materialize(
    spotify: &SpotifyClient,
    playlist: &GeneratedPlaylist,
    owner_id: &str,
    public: bool,
    limit: usize,
) -> EngineResult<String> {
    let request = CreatePlaylistRequest {
        name: playlist.name.clone(),
        description: playlist.description.clone(),
        public,
    };

    debug!(owner = %owner_id, name = %request.name, "Creating playlist");

    let created = spotify
        .create_playlist(owner_id, &request)
        .await
        .map_err(|e| EngineError::from_spotify(PipelineStage::Materializing, e))?;

    let uris: Vec<String> = playlist
        .tracks
        .iter()
        .take(limit)
        .map(|t| t.uri.clone())
        .collect();

    spotify
        .add_tracks(&created.id, &uris)
        .await
        .map_err(|e| add_tracks_error(&created.id, e))?;

    info!(
        playlist_id = %created.id,
        track_count = uris.len(),
        "Playlist materialized"
    );

    Ok(created.id)
}

/// Map a track-addition failure, naming the now-orphaned playlist
fn add_tracks_error(playlist_id: &str, err: SpotifyError) -> EngineError {
    match err {
        SpotifyError::MissingToken | SpotifyError::Api { status: 401, .. } => EngineError::Auth,
        e if e.is_retryable() => EngineError::Network {
            stage: PipelineStage::Materializing,
            message: format!("adding tracks to playlist {} failed: {}", playlist_id, e),
        },
        e => EngineError::Materialization(format!(
            "playlist {} was created but adding tracks failed: {}",
            playlist_id, e
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use moodmix_shared_config::SpotifyConfig;
    use moodmix_spotify_client::{StaticTokenProvider, Track};
    use moodmix_test_utils::MockSpotifyServer;

    use crate::models::{CandidateTrack, MoodAnalysis, MusicParameters};

    fn test_client(url: &str) -> SpotifyClient {
        SpotifyClient::new(
            &SpotifyConfig::with_url(url),
            Arc::new(StaticTokenProvider::new("test-token")),
        )
        .unwrap()
        .with_max_retries(0)
    }

    fn candidate(id: &str) -> CandidateTrack {
        CandidateTrack::from(Track {
            id: id.to_string(),
            name: format!("Track {}", id),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            uri: format!("spotify:track:{}", id),
            duration_ms: Some(200_000),
        })
    }

    fn playlist(track_count: usize) -> GeneratedPlaylist {
        GeneratedPlaylist {
            name: "Happy Dance Mix".to_string(),
            description: "Generated for a happy mood".to_string(),
            tracks: (0..track_count)
                .map(|i| candidate(&format!("t{}", i)))
                .collect(),
            mood: MoodAnalysis::default(),
            parameters: MusicParameters::default(),
            spotify_playlist_id: None,
        }
    }

    #[tokio::test]
    async fn test_materialize_creates_then_adds() {
        let server = MockSpotifyServer::start().await;
        server.mock_create_playlist("user42", "pl1").await;
        server.mock_add_tracks("pl1").await;

        let client = test_client(&server.url());
        let id = materialize(&client, &playlist(3), "user42", false, 20)
            .await
            .unwrap();

        assert_eq!(id, "pl1");
        assert_eq!(server.requests_with_path_prefix("/v1/users").await, 1);
        assert_eq!(server.requests_with_path_prefix("/v1/playlists").await, 1);
    }

    #[tokio::test]
    async fn test_materialize_takes_at_most_limit_uris() {
        let server = MockSpotifyServer::start().await;
        server.mock_create_playlist("user42", "pl1").await;
        server.mock_add_tracks("pl1").await;

        let client = test_client(&server.url());
        materialize(&client, &playlist(10), "user42", false, 4)
            .await
            .unwrap();

        let requests = server.inner().received_requests().await.unwrap();
        let add_request = requests
            .iter()
            .find(|r| r.url.path() == "/v1/playlists/pl1/tracks")
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&add_request.body).unwrap();
        assert_eq!(body["uris"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_create_failure_is_materialization_error() {
        let server = MockSpotifyServer::start().await;
        server.mock_create_playlist_failure("user42", 403).await;

        let client = test_client(&server.url());
        let result = materialize(&client, &playlist(3), "user42", false, 20).await;

        assert_matches!(result, Err(EngineError::Materialization(_)));
        assert_eq!(server.requests_with_path_prefix("/v1/playlists").await, 0);
    }

    #[tokio::test]
    async fn test_add_failure_names_orphaned_playlist() {
        let server = MockSpotifyServer::start().await;
        server.mock_create_playlist("user42", "pl1").await;
        server.mock_add_tracks_failure("pl1", 403).await;

        let client = test_client(&server.url());
        let result = materialize(&client, &playlist(3), "user42", false, 20).await;

        match result {
            Err(EngineError::Materialization(message)) => {
                assert!(message.contains("pl1"), "message was: {}", message);
            }
            other => panic!("expected Materialization error, got {:?}", other),
        }
    }
}
