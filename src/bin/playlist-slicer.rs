//! Telegram bot binary
//!
//! Environment:
//! - `TOKEN` (or `TELOXIDE_TOKEN`): bot token, required
//! - `PLAYLIST_SLICER_CONFIG`: optional path to a JSON config file
//! - `RUST_LOG`: log filter, defaults to `playlist_slicer=info`

use playlist_slicer::telegram::{self, TelegramSink};
use playlist_slicer::{Config, PlaylistBot, SleepPacer, extractor};
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::Bot;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("playlist_slicer=info")),
        )
        .init();

    let token = std::env::var("TOKEN")
        .or_else(|_| std::env::var("TELOXIDE_TOKEN"))
        .map_err(|_| "TOKEN is not set")?;

    let config = match std::env::var_os("PLAYLIST_SLICER_CONFIG") {
        Some(path) => Config::from_file(&PathBuf::from(path))?,
        None => Config::default(),
    };

    let bot = Bot::new(token);
    let service = PlaylistBot::new(
        config.clone(),
        extractor::from_config(&config.tool),
        Arc::new(TelegramSink::new(bot.clone())),
        Arc::new(SleepPacer::new(config.delivery.pacing_delay)),
    )?;

    tracing::info!("playlist slicer bot started");
    telegram::run(bot, service).await;
    Ok(())
}
