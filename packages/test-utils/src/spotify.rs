//! Mock Spotify server for testing catalog operations
//!
//! Provides a [`MockSpotifyServer`] simulating the search, audio-features,
//! playlist-creation and track-addition endpoints, plus track fixtures.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a search-result track object in the catalog's wire shape
pub fn track_fixture(id: &str, name: &str, artist: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "artists": [{"name": artist}],
        "album": {"name": format!("{} (Album)", name), "images": []},
        "uri": format!("spotify:track:{}", id),
        "duration_ms": 210_000
    })
}

/// Build an audio-features object aligned with a track fixture
pub fn features_fixture(id: &str, energy: f64, valence: f64, tempo: f64) -> serde_json::Value {
    json!({
        "id": id,
        "energy": energy,
        "valence": valence,
        "tempo": tempo,
        "danceability": 0.6,
        "acousticness": 0.2,
        "instrumentalness": 0.05
    })
}

/// Mock Spotify server for testing catalog operations
pub struct MockSpotifyServer {
    server: MockServer,
}

impl MockSpotifyServer {
    /// Start a new mock Spotify server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get reference to the underlying mock server for custom mock setups
    /// and received-request inspection
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Mount a search mock answering any query with `items`
    pub async fn mock_search_any(&self, items: &[serde_json::Value]) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": items}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a search mock answering only the exact query `q` with `items`
    ///
    /// Later-mounted exact-query mocks take precedence over
    /// [`mock_search_any`], so tests can pin per-tier results.
    pub async fn mock_search_for_query(&self, q: &str, items: &[serde_json::Value]) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", q))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": items}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a search mock answering the exact query `q` with zero results
    pub async fn mock_search_empty_for_query(&self, q: &str) {
        self.mock_search_for_query(q, &[]).await;
    }

    /// Mount a search mock failing with the given status for any query
    pub async fn mock_search_failure(&self, status_code: u16) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": {"status": status_code, "message": "search failed"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an audio-features mock returning the given feature objects
    pub async fn mock_audio_features(&self, features: &[serde_json::Value]) {
        Mock::given(method("GET"))
            .and(path("/v1/audio-features"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "audio_features": features
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an audio-features mock that fails (enrichment must degrade)
    pub async fn mock_audio_features_failure(&self, status_code: u16) {
        Mock::given(method("GET"))
            .and(path("/v1/audio-features"))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": {"status": status_code, "message": "features unavailable"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a playlist-creation mock for `owner_id` returning `playlist_id`
    pub async fn mock_create_playlist(&self, owner_id: &str, playlist_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v1/users/{}/playlists", owner_id)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": playlist_id,
                "name": "created"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a playlist-creation mock that fails
    pub async fn mock_create_playlist_failure(&self, owner_id: &str, status_code: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/v1/users/{}/playlists", owner_id)))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": {"status": status_code, "message": "create failed"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a track-addition mock for `playlist_id`
    pub async fn mock_add_tracks(&self, playlist_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v1/playlists/{}/tracks", playlist_id)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "snapshot_id": "snapshot-1"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a track-addition mock that fails
    pub async fn mock_add_tracks_failure(&self, playlist_id: &str, status_code: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/v1/playlists/{}/tracks", playlist_id)))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": {"status": status_code, "message": "add failed"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Count received requests whose path starts with `prefix`
    pub async fn requests_with_path_prefix(&self, prefix: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path().starts_with(prefix))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_spotify_server_starts() {
        let server = MockSpotifyServer::start().await;
        assert!(server.url().starts_with("http://"));
    }

    #[tokio::test]
    async fn test_search_mock_by_query() {
        let server = MockSpotifyServer::start().await;
        server.mock_search_empty_for_query("nothing here").await;
        server
            .mock_search_for_query("pop dance", &[track_fixture("t1", "One", "A")])
            .await;

        let client = reqwest::Client::new();

        let body: serde_json::Value = client
            .get(format!("{}/v1/search", server.url()))
            .query(&[("q", "pop dance"), ("type", "track"), ("limit", "10")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["tracks"]["items"].as_array().unwrap().len(), 1);

        let body: serde_json::Value = client
            .get(format!("{}/v1/search", server.url()))
            .query(&[("q", "nothing here"), ("type", "track"), ("limit", "10")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(body["tracks"]["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_add_mocks() {
        let server = MockSpotifyServer::start().await;
        server.mock_create_playlist("user1", "pl9").await;
        server.mock_add_tracks("pl9").await;

        let client = reqwest::Client::new();
        let body: serde_json::Value = client
            .post(format!("{}/v1/users/user1/playlists", server.url()))
            .json(&json!({"name": "x", "description": "", "public": false}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["id"], "pl9");

        let response = client
            .post(format!("{}/v1/playlists/pl9/tracks", server.url()))
            .json(&json!({"uris": ["spotify:track:t1"]}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);

        assert_eq!(server.requests_with_path_prefix("/v1/users").await, 1);
        assert_eq!(server.requests_with_path_prefix("/v1/playlists").await, 1);
    }

    #[tokio::test]
    async fn test_track_fixture_shape() {
        let fixture = track_fixture("t1", "Song", "Artist");
        assert_eq!(fixture["uri"], "spotify:track:t1");
        assert_eq!(fixture["artists"][0]["name"], "Artist");
    }
}
