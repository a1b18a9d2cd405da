//! Spotify Web API request and response models

use serde::{Deserialize, Serialize};

/// A track from the Spotify catalog, normalized for consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Spotify track id
    pub id: String,
    /// Track name
    pub name: String,
    /// First listed artist
    pub artist: String,
    /// Album name
    pub album: String,
    /// Spotify URI (used for playlist addition)
    pub uri: String,
    /// Track duration in milliseconds
    pub duration_ms: Option<u64>,
}

/// Audio feature values for a track
#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeatures {
    /// Track id these features belong to
    pub id: String,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub valence: f64,
    #[serde(default)]
    pub tempo: f64,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub acousticness: f64,
    #[serde(default)]
    pub instrumentalness: f64,
}

/// Request body for playlist creation
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    /// Playlist name
    pub name: String,
    /// Playlist description
    pub description: String,
    /// Whether the playlist is public
    pub public: bool,
}

/// A created playlist resource
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPlaylist {
    /// Spotify playlist id
    pub id: String,
    /// Playlist name as stored by Spotify
    #[serde(default)]
    pub name: String,
}

// Internal response types for deserialization

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: TracksPage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TracksPage {
    #[serde(default)]
    pub items: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<RawArtist>,
    pub album: Option<RawAlbum>,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAlbum {
    #[serde(default)]
    pub name: String,
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Self {
        let artist = raw
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_else(|| "Unknown Artist".to_string());

        Self {
            id: raw.id,
            name: raw.name,
            artist,
            album: raw.album.map(|a| a.name).unwrap_or_default(),
            uri: raw.uri,
            duration_ms: raw.duration_ms,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AudioFeaturesResponse {
    // Spotify returns null entries for ids it has no features for
    #[serde(default)]
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotResponse {
    #[serde(default)]
    pub snapshot_id: String,
}

/// Spotify API error response body
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_track_conversion() {
        let raw = RawTrack {
            id: "t1".to_string(),
            name: "Song".to_string(),
            artists: vec![
                RawArtist {
                    name: "First".to_string(),
                },
                RawArtist {
                    name: "Second".to_string(),
                },
            ],
            album: Some(RawAlbum {
                name: "Album".to_string(),
            }),
            uri: "spotify:track:t1".to_string(),
            duration_ms: Some(180_000),
        };

        let track: Track = raw.into();
        assert_eq!(track.artist, "First");
        assert_eq!(track.album, "Album");
        assert_eq!(track.uri, "spotify:track:t1");
    }

    #[test]
    fn test_raw_track_without_artists() {
        let raw = RawTrack {
            id: "t2".to_string(),
            name: "Instrumental".to_string(),
            artists: vec![],
            album: None,
            uri: "spotify:track:t2".to_string(),
            duration_ms: None,
        };

        let track: Track = raw.into();
        assert_eq!(track.artist, "Unknown Artist");
        assert_eq!(track.album, "");
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{
            "tracks": {
                "items": [
                    {
                        "id": "abc",
                        "name": "Tune",
                        "artists": [{"name": "Artist"}],
                        "album": {"name": "LP", "images": [{"url": "http://img"}]},
                        "uri": "spotify:track:abc",
                        "duration_ms": 200000
                    }
                ]
            }
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.tracks.items.len(), 1);
        assert_eq!(response.tracks.items[0].id, "abc");
    }

    #[test]
    fn test_audio_features_with_nulls() {
        let json = r#"{
            "audio_features": [
                {"id": "a", "energy": 0.8, "valence": 0.9, "tempo": 120.0,
                 "danceability": 0.7, "acousticness": 0.1, "instrumentalness": 0.0},
                null
            ]
        }"#;
        let response: AudioFeaturesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.audio_features.len(), 2);
        assert!(response.audio_features[0].is_some());
        assert!(response.audio_features[1].is_none());
    }

    #[test]
    fn test_error_response_parsing() {
        let json = r#"{"error": {"status": 401, "message": "Invalid access token"}}"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.status, 401);
        assert_eq!(response.error.message, "Invalid access token");
    }
}
