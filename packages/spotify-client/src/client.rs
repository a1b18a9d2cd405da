//! Spotify Web API client implementation

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moodmix_shared_config::SpotifyConfig;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument, warn};

use crate::error::{SpotifyError, SpotifyResult};
use crate::models::{
    AddTracksRequest, AudioFeatures, AudioFeaturesResponse, CreatePlaylistRequest,
    CreatedPlaylist, ErrorResponse, SearchResponse, SnapshotResponse, Track,
};
use crate::session::{AccessToken, TokenProvider};

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Maximum results per search request (Spotify cap)
const MAX_SEARCH_LIMIT: u32 = 50;

/// Maximum ids per audio-features request (Spotify cap)
const MAX_AUDIO_FEATURES_IDS: usize = 100;

/// Maximum search query length
const MAX_QUERY_LENGTH: usize = 250;

/// Default number of retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Spotify Web API client
///
/// Authentication is delegated to an injected [`TokenProvider`]; the client
/// reads a bearer token per request and never refreshes tokens itself.
/// Idempotent reads are retried on transient failures; mutating calls
/// (playlist creation, track addition) are issued exactly once so a retry
/// can never duplicate a remote resource.
#[derive(Clone)]
pub struct SpotifyClient {
    http_client: Client,
    config: SpotifyConfig,
    token_provider: Arc<dyn TokenProvider>,
    max_retries: u32,
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("api_url", &self.config.api_url)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl SpotifyClient {
    /// Create a new Spotify client
    pub fn new(
        config: &SpotifyConfig,
        token_provider: Arc<dyn TokenProvider>,
    ) -> SpotifyResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("Moodmix/1.0")
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
            token_provider,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries for idempotent requests
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    /// Validate a search query
    fn validate_query(query: &str) -> SpotifyResult<&str> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SpotifyError::InvalidInput(
                "search query cannot be empty".to_string(),
            ));
        }
        if trimmed.len() > MAX_QUERY_LENGTH {
            return Err(SpotifyError::InvalidInput(format!(
                "search query too long (max {} characters)",
                MAX_QUERY_LENGTH
            )));
        }
        Ok(trimmed)
    }

    /// Get the current access token or fail fast
    async fn bearer(&self) -> SpotifyResult<AccessToken> {
        self.token_provider
            .access_token()
            .await
            .ok_or(SpotifyError::MissingToken)
    }

    /// Execute an operation with retry logic for transient failures
    async fn with_retry<T, F, Fut>(&self, operation: F) -> SpotifyResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = SpotifyResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                    warn!(
                        attempt = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Spotify request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Turn a non-success response into a typed error
    async fn error_from_response(response: Response) -> SpotifyError {
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            warn!("Spotify API rate limited");
            return SpotifyError::RateLimited;
        }

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error.message)
            .unwrap_or(text);

        SpotifyError::Api { status, message }
    }

    /// Search the catalog for tracks
    ///
    /// Returns at most `limit` tracks (clamped to the API maximum of 50),
    /// in catalog ranking order.
    #[instrument(skip(self))]
    pub async fn search_tracks(&self, query: &str, limit: u32) -> SpotifyResult<Vec<Track>> {
        let query = Self::validate_query(query)?;
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        let limit_str = limit.to_string();

        debug!(query = %query, limit, "Searching Spotify tracks");

        let response: SearchResponse = self
            .with_retry(|| async {
                let token = self.bearer().await?;
                let response = self
                    .http_client
                    .get(self.config.search_url())
                    .bearer_auth(token.as_str())
                    .query(&[("q", query), ("type", "track"), ("limit", &limit_str)])
                    .send()
                    .await
                    .map_err(|e| {
                        if e.is_timeout() {
                            SpotifyError::Timeout
                        } else {
                            SpotifyError::Http(e)
                        }
                    })?;

                if !response.status().is_success() {
                    return Err(Self::error_from_response(response).await);
                }

                let text = response.text().await.map_err(SpotifyError::Http)?;
                Ok(serde_json::from_str(&text)?)
            })
            .await?;

        let tracks: Vec<Track> = response.tracks.items.into_iter().map(Into::into).collect();

        debug!(result_count = tracks.len(), "Spotify search complete");

        Ok(tracks)
    }

    /// Fetch audio features for a batch of track ids
    ///
    /// The result is positionally aligned with `ids`; entries the catalog
    /// has no features for come back as `None`.
    #[instrument(skip(self, ids), fields(id_count = ids.len()))]
    pub async fn audio_features(
        &self,
        ids: &[String],
    ) -> SpotifyResult<Vec<Option<AudioFeatures>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() > MAX_AUDIO_FEATURES_IDS {
            return Err(SpotifyError::InvalidInput(format!(
                "too many ids for audio-features (max {})",
                MAX_AUDIO_FEATURES_IDS
            )));
        }

        let joined = ids.join(",");

        let response: AudioFeaturesResponse = self
            .with_retry(|| async {
                let token = self.bearer().await?;
                let response = self
                    .http_client
                    .get(self.config.audio_features_url())
                    .bearer_auth(token.as_str())
                    .query(&[("ids", joined.as_str())])
                    .send()
                    .await
                    .map_err(|e| {
                        if e.is_timeout() {
                            SpotifyError::Timeout
                        } else {
                            SpotifyError::Http(e)
                        }
                    })?;

                if !response.status().is_success() {
                    return Err(Self::error_from_response(response).await);
                }

                let text = response.text().await.map_err(SpotifyError::Http)?;
                Ok(serde_json::from_str(&text)?)
            })
            .await?;

        Ok(response.audio_features)
    }

    /// Create a playlist owned by `owner_id`
    ///
    /// Single-shot request (no retry): a duplicate playlist is worse than a
    /// surfaced error.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> SpotifyResult<CreatedPlaylist> {
        if owner_id.trim().is_empty() {
            return Err(SpotifyError::InvalidInput(
                "owner id cannot be empty".to_string(),
            ));
        }

        let token = self.bearer().await?;

        debug!(owner = %owner_id, "Creating Spotify playlist");

        let response = self
            .http_client
            .post(self.config.user_playlists_url(owner_id))
            .bearer_auth(token.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpotifyError::Timeout
                } else {
                    SpotifyError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let created: CreatedPlaylist = serde_json::from_str(&response.text().await?)?;

        debug!(playlist_id = %created.id, "Playlist created");

        Ok(created)
    }

    /// Add tracks to an existing playlist in one batch call
    ///
    /// Single-shot request (no retry). Returns the playlist snapshot id.
    #[instrument(skip(self, uris), fields(uri_count = uris.len()))]
    pub async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> SpotifyResult<String> {
        if playlist_id.trim().is_empty() {
            return Err(SpotifyError::InvalidInput(
                "playlist id cannot be empty".to_string(),
            ));
        }
        if uris.is_empty() {
            return Err(SpotifyError::InvalidInput(
                "no track uris to add".to_string(),
            ));
        }

        let token = self.bearer().await?;

        let request = AddTracksRequest {
            uris: uris.to_vec(),
        };

        let response = self
            .http_client
            .post(self.config.playlist_tracks_url(playlist_id))
            .bearer_auth(token.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpotifyError::Timeout
                } else {
                    SpotifyError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let snapshot: SnapshotResponse = serde_json::from_str(&response.text().await?)?;

        debug!(playlist_id = %playlist_id, "Tracks added to playlist");

        Ok(snapshot.snapshot_id)
    }
}
