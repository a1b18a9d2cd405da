//! Shared test utilities for the Moodmix workspace
//!
//! This crate provides mock implementations of the external services the
//! playlist engine talks to, for testing without network dependencies.
//!
//! # Mock Services
//!
//! - [`MockGeminiServer`] - Mock text-generation server for mood analysis
//!   and parameter mapping tests
//! - [`MockSpotifyServer`] - Mock catalog server for search, enrichment
//!   and playlist materialization tests
//!
//! # Example
//!
//! ```rust,ignore
//! use moodmix_test_utils::{MockGeminiServer, MockSpotifyServer};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let gemini = MockGeminiServer::start().await;
//!     gemini.mock_generate_success("{\"mood\": \"happy\"}").await;
//!
//!     // Use gemini.url() to configure your client
//! }
//! ```

mod gemini;
mod spotify;

pub use gemini::MockGeminiServer;
pub use spotify::{features_fixture, track_fixture, MockSpotifyServer};
