//! Playlist extraction through an external tool
//!
//! The core abstraction is the [`PlaylistExtractor`] trait. Two implementations
//! are provided:
//!
//! - [`CliExtractor`]: runs a yt-dlp compatible binary with a probe, a
//!   wall-clock timeout, and line-by-line parsing of its JSON output
//! - [`NoOpExtractor`]: stand-in when no binary can be found
//!
//! [`from_config`] picks between them the same way at every startup: explicit
//! path first, then a PATH search, then the no-op fallback.

mod args;
mod cli;
mod noop;
mod traits;

pub use args::build_extraction_args;
pub use cli::CliExtractor;
pub use noop::NoOpExtractor;
pub use traits::PlaylistExtractor;

use crate::config::ToolConfig;
use std::sync::Arc;

/// Build the extractor described by `config`
pub fn from_config(config: &ToolConfig) -> Arc<dyn PlaylistExtractor> {
    let configure = |extractor: CliExtractor| {
        extractor
            .with_probe_timeout(config.probe_timeout)
            .with_max_diagnostic_chars(config.max_diagnostic_chars)
    };

    let extractor: Arc<dyn PlaylistExtractor> = if let Some(ref path) = config.binary_path {
        // Use explicitly configured binary path
        Arc::new(configure(CliExtractor::new(path.clone())))
    } else if config.search_path {
        // Search PATH for the binary
        CliExtractor::from_path(&config.binary_name)
            .map(|e| Arc::new(configure(e)) as Arc<dyn PlaylistExtractor>)
            .unwrap_or_else(|| {
                tracing::warn!(binary = %config.binary_name, "extraction tool not found in PATH");
                Arc::new(NoOpExtractor)
            })
    } else {
        // No binary configured and PATH search disabled
        Arc::new(NoOpExtractor)
    };

    tracing::info!(extractor = extractor.name(), "playlist extractor initialized");
    extractor
}
