//! Spotify Web API client for Moodmix
//!
//! This crate provides the catalog-side operations the playlist engine
//! needs:
//! - Track search
//! - Batched audio-feature lookup (best-effort enrichment)
//! - Playlist creation and track addition
//!
//! Authentication is delegated to a [`TokenProvider`] collaborator; the
//! client reads a bearer token per request and never performs token
//! refresh itself.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use moodmix_shared_config::SpotifyConfig;
//! use moodmix_spotify_client::{SpotifyClient, StaticTokenProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SpotifyConfig::from_env()?;
//! let client = SpotifyClient::new(&config, Arc::new(StaticTokenProvider::new("token")))?;
//!
//! let tracks = client.search_tracks("pop dance", 20).await?;
//! for track in tracks {
//!     println!("{} - {}", track.artist, track.name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;
mod session;

pub use client::SpotifyClient;
pub use error::{SpotifyError, SpotifyResult};
pub use models::{AudioFeatures, CreatePlaylistRequest, CreatedPlaylist, Track};
pub use session::{
    AccessToken, SessionObserver, SessionStore, StaticTokenProvider, SubscriptionId, TokenProvider,
};
