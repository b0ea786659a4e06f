//! No-op extractor for graceful degradation

use super::traits::PlaylistExtractor;
use crate::types::{ExtractionOutcome, PlaylistSettings};
use async_trait::async_trait;
use std::time::Duration;

/// Extractor used when no extraction binary is available or configured
///
/// Every request reports [`ExtractionOutcome::ToolUnavailable`], so users get
/// a clear "tool not installed" reply instead of the service refusing to start.
pub struct NoOpExtractor;

#[async_trait]
impl PlaylistExtractor for NoOpExtractor {
    async fn extract(
        &self,
        _url: &str,
        _settings: &PlaylistSettings,
        _timeout: Duration,
    ) -> ExtractionOutcome {
        ExtractionOutcome::ToolUnavailable
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
