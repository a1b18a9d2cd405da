use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodmix_engine::{Config, GenerateRequest, PlaylistEngine};
use moodmix_gemini_client::GeminiClient;
use moodmix_shared_config::get_required_env;
use moodmix_spotify_client::{AccessToken, SessionStore, SpotifyClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodmix_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let mood_text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    anyhow::ensure!(
        !mood_text.trim().is_empty(),
        "usage: moodmix-engine <mood description>"
    );

    let config = Config::from_env()?;

    let owner_id = get_required_env("SPOTIFY_USER_ID")
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    let access_token = get_required_env("SPOTIFY_ACCESS_TOKEN")
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    let session = Arc::new(SessionStore::new());
    session.set_token(AccessToken::new(access_token));

    let gemini = GeminiClient::new(config.gemini())?;
    let spotify = SpotifyClient::new(config.spotify(), session)?;

    tracing::info!(environment = %config.environment(), "Starting Moodmix engine");

    let engine = PlaylistEngine::new(gemini, spotify);
    let request = GenerateRequest::new(owner_id)
        .with_free_text(mood_text)
        .with_limit(config.default_limit);

    let playlist = engine.generate(&request).await?;

    println!("{}", serde_json::to_string_pretty(&playlist.summary())?);

    Ok(())
}
