//! Trait for playlist extraction backends

use crate::types::{ExtractionOutcome, PlaylistSettings};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for playlist extraction
///
/// Implementations turn a playlist reference plus finalized settings into an
/// [`ExtractionOutcome`]. Failures are part of the outcome, never a panic or an
/// `Err`, so the caller can always pattern-match and reset the session.
///
/// # Examples
///
/// ```no_run
/// use playlist_slicer::extractor::{CliExtractor, PlaylistExtractor};
/// use playlist_slicer::types::{ExtractionOutcome, PlaylistSettings};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let extractor = CliExtractor::from_path("yt-dlp").expect("yt-dlp not found in PATH");
///
/// let outcome = extractor
///     .extract(
///         "https://www.youtube.com/playlist?list=PL123",
///         &PlaylistSettings::quick(50),
///         Duration::from_secs(30),
///     )
///     .await;
///
/// if let ExtractionOutcome::Success(entries) = outcome {
///     println!("{} entries", entries.len());
/// }
/// # }
/// ```
#[async_trait]
pub trait PlaylistExtractor: Send + Sync {
    /// List the entries of `url` within the range described by `settings`
    ///
    /// # Arguments
    ///
    /// * `url` - Validated playlist reference
    /// * `settings` - Range, order, and pacing parameters
    /// * `timeout` - Wall-clock bound; exceeding it yields [`ExtractionOutcome::TimedOut`]
    ///   and the underlying work must be stopped
    async fn extract(
        &self,
        url: &str,
        settings: &PlaylistSettings,
        timeout: Duration,
    ) -> ExtractionOutcome;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
