//! # playlist-slicer
//!
//! Chat bot core that turns a video playlist link into individual video
//! links, delivered in paced batches.
//!
//! ## Design Philosophy
//!
//! playlist-slicer is designed to be:
//! - **Transport-agnostic** - The core talks to users through a [`MessageSink`]
//! - **Tool-backed** - Playlist listing is delegated to an external extractor (yt-dlp)
//! - **Per-user sessions** - Every user moves through their own conversation flow
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use playlist_slicer::{Config, MemorySink, PlaylistBot, SleepPacer, UserId, extractor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let sink = Arc::new(MemorySink::new());
//!     let bot = PlaylistBot::new(
//!         config.clone(),
//!         extractor::from_config(&config.tool),
//!         sink.clone(),
//!         Arc::new(SleepPacer::new(config.delivery.pacing_delay)),
//!     )?;
//!
//!     let mut events = bot.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     bot.handle_message(UserId(1), "/quick").await?;
//!     bot.handle_message(UserId(1), "https://www.youtube.com/playlist?list=PLabc")
//!         .await?;
//!
//!     for (_user, text) in sink.take() {
//!         println!("{}", text);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Per-user conversation state machine
pub mod conversation;
/// Batched, paced delivery
pub mod delivery;
/// Error types
pub mod error;
/// Playlist extraction backends
pub mod extractor;
/// User-facing texts
pub mod messages;
/// Extraction tool output parsing
pub mod parser;
/// Bot service
pub mod service;
/// Telegram transport
#[cfg(feature = "telegram")]
pub mod telegram;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, ConversationConfig, DeliveryConfig, ToolConfig};
pub use conversation::{SessionStore, Stage, Transition};
pub use delivery::{DeliveryPipeline, DeliveryReport, MemorySink, MessageSink, NoPacer, Pacer, SleepPacer};
pub use error::{Error, Result, ValidationError};
pub use extractor::{CliExtractor, NoOpExtractor, PlaylistExtractor};
pub use service::{Command, PlaylistBot};
pub use types::{
    Entry, Event, ExtractionOutcome, FlowKind, OutcomeKind, PlaylistSettings, RangeEnd, UserId,
};

/// Wait for a termination signal
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Transports use this to stop polling for updates gracefully.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Wait for a termination signal
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
