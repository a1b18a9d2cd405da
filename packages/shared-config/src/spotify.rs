//! Spotify catalog-service configuration types

use crate::{get_env_or_default, parse_env, ConfigResult};

/// Spotify Web API configuration
///
/// Access tokens are not part of the configuration; they are supplied at
/// request time by the session collaborator.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    /// API base URL
    pub api_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Whether generated playlists are created as public
    pub public_playlists: bool,
}

impl SpotifyConfig {
    /// Load Spotify configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            api_url: get_env_or_default("SPOTIFY_API_URL", "https://api.spotify.com"),
            timeout_secs: parse_env("SPOTIFY_TIMEOUT", 10)?,
            public_playlists: parse_env("SPOTIFY_PUBLIC_PLAYLISTS", false)?,
        })
    }

    /// Create a configuration with a custom base URL (useful for testing)
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs: 10,
            public_playlists: false,
        }
    }

    /// Get the track search endpoint URL
    pub fn search_url(&self) -> String {
        format!("{}/v1/search", self.api_url.trim_end_matches('/'))
    }

    /// Get the batched audio-features endpoint URL
    pub fn audio_features_url(&self) -> String {
        format!("{}/v1/audio-features", self.api_url.trim_end_matches('/'))
    }

    /// Get the playlist-creation endpoint URL for a user
    pub fn user_playlists_url(&self, owner_id: &str) -> String {
        format!(
            "{}/v1/users/{}/playlists",
            self.api_url.trim_end_matches('/'),
            owner_id
        )
    }

    /// Get the track-addition endpoint URL for a playlist
    pub fn playlist_tracks_url(&self, playlist_id: &str) -> String {
        format!(
            "{}/v1/playlists/{}/tracks",
            self.api_url.trim_end_matches('/'),
            playlist_id
        )
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.spotify.com".to_string(),
            timeout_secs: 10,
            public_playlists: false,
        }
    }
}
