//! Engine configuration loaded from environment variables
//!
//! Wraps the shared service configuration and adds the engine's own
//! knobs, with development-friendly defaults.

use std::env;

use anyhow::{Context, Result};
use moodmix_shared_config::{CommonConfig, Environment, GeminiConfig, SpotifyConfig};

use crate::pipeline::DEFAULT_TRACK_LIMIT;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with the service clients
    pub common: CommonConfig,

    /// Default playlist track limit when a request does not set one
    pub default_limit: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        let default_limit: usize = env::var("MOODMIX_DEFAULT_LIMIT")
            .unwrap_or_else(|_| DEFAULT_TRACK_LIMIT.to_string())
            .parse()
            .context("Invalid MOODMIX_DEFAULT_LIMIT value")?;
        anyhow::ensure!(default_limit > 0, "MOODMIX_DEFAULT_LIMIT must be at least 1");

        Ok(Self {
            common,
            default_limit,
        })
    }

    // Convenience accessors for common config fields

    /// Get Gemini configuration
    pub fn gemini(&self) -> &GeminiConfig {
        &self.common.gemini
    }

    /// Get Spotify configuration
    pub fn spotify(&self) -> &SpotifyConfig {
        &self.common.spotify
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
