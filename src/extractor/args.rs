//! Command-line construction for the extraction tool

use crate::types::{PlaylistSettings, RangeEnd};

/// Flatten playlist entries instead of resolving every video
pub const FLAT_PLAYLIST: &str = "--flat-playlist";
/// One JSON object per line on stdout
pub const DUMP_JSON: &str = "--dump-json";
/// No progress bars or other terminal interaction
pub const NO_PROGRESS: &str = "--no-progress";
/// First playlist index to include
pub const PLAYLIST_START: &str = "--playlist-start";
/// Last playlist index to include
pub const PLAYLIST_END: &str = "--playlist-end";
/// Emit entries in reverse playlist order
pub const PLAYLIST_REVERSE: &str = "--playlist-reverse";
/// Keep going past per-item errors
pub const IGNORE_ERRORS: &str = "--ignore-errors";
/// Presence probe
pub const VERSION: &str = "--version";

/// Build the argument list for an extraction run
///
/// Range flags are only emitted when they narrow the default: no start flag for
/// index 1, no end flag for [`RangeEnd::Unbounded`]. The playlist reference is
/// always the last argument.
///
/// # Examples
///
/// ```
/// use playlist_slicer::extractor::build_extraction_args;
/// use playlist_slicer::types::PlaylistSettings;
///
/// let args = build_extraction_args("https://youtube.com/playlist?list=PL1", &PlaylistSettings::quick(50));
/// assert_eq!(args.last().map(String::as_str), Some("https://youtube.com/playlist?list=PL1"));
/// assert!(!args.iter().any(|a| a == "--playlist-start"));
/// ```
pub fn build_extraction_args(url: &str, settings: &PlaylistSettings) -> Vec<String> {
    let mut args: Vec<String> = vec![
        FLAT_PLAYLIST.into(),
        DUMP_JSON.into(),
        NO_PROGRESS.into(),
    ];

    if settings.start > 1 {
        args.push(PLAYLIST_START.into());
        args.push(settings.start.to_string());
    }

    if let RangeEnd::Index(end) = settings.end {
        args.push(PLAYLIST_END.into());
        args.push(end.to_string());
    }

    if settings.reverse {
        args.push(PLAYLIST_REVERSE.into());
    }

    args.push(IGNORE_ERRORS.into());
    args.push(url.to_string());
    args
}
