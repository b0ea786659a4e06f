//! Validation of user replies

use crate::config::Config;
use crate::error::{Result, ValidationError};
use crate::messages::{FORWARD, REVERSE};
use crate::types::{PlaylistSettings, RangeEnd};
use regex::Regex;

/// Recognises playlist references
///
/// A reply is accepted when any configured pattern matches the trimmed text.
#[derive(Clone, Debug)]
pub struct PlaylistUrlMatcher {
    patterns: Vec<Regex>,
}

impl PlaylistUrlMatcher {
    /// Compile the patterns from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            patterns: config.compiled_url_patterns()?,
        })
    }

    /// Whether `text` looks like a playlist reference
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// The trimmed reference, or [`ValidationError::NotAPlaylist`]
    ///
    /// Links pasted without a scheme get `https://` prepended.
    pub fn validate(&self, text: &str) -> std::result::Result<String, ValidationError> {
        if !self.matches(text) {
            return Err(ValidationError::NotAPlaylist);
        }
        let url = text.trim();
        if url.starts_with("https://") || url.starts_with("http://") {
            Ok(url.to_string())
        } else {
            Ok(format!("https://{}", url))
        }
    }
}

fn parse_integer(text: &str) -> std::result::Result<i64, ValidationError> {
    let text = text.trim();
    text.parse::<i64>()
        .map_err(|_| ValidationError::NotANumber(text.to_string()))
}

/// Start index: an integer of at least 1
pub fn parse_start(text: &str) -> std::result::Result<u32, ValidationError> {
    let n = parse_integer(text)?;
    if n < 1 {
        return Err(ValidationError::StartOutOfRange(n));
    }
    u32::try_from(n).map_err(|_| ValidationError::StartTooLarge(n))
}

/// End index: 0 means unbounded, otherwise an index no smaller than `start`
pub fn parse_end(text: &str, start: u32) -> std::result::Result<RangeEnd, ValidationError> {
    let n = parse_integer(text)?;
    if n < 0 {
        return Err(ValidationError::NegativeEnd(n));
    }
    if n == 0 {
        return Ok(RangeEnd::Unbounded);
    }
    // Anything past u32 is longer than any playlist; treat it as no bound
    let Ok(end) = u32::try_from(n) else {
        return Ok(RangeEnd::Unbounded);
    };
    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }
    Ok(RangeEnd::Index(end))
}

/// Direction token: exactly "forward" or "reverse" (surrounding whitespace ignored)
///
/// Returns `true` for reverse.
pub fn parse_direction(text: &str) -> std::result::Result<bool, ValidationError> {
    match text.trim() {
        FORWARD => Ok(false),
        REVERSE => Ok(true),
        other => Err(ValidationError::UnknownDirection(other.to_string())),
    }
}

/// Batch size: an integer in [1, 100]
pub fn parse_batch_size(text: &str) -> std::result::Result<u32, ValidationError> {
    let n = parse_integer(text)?;
    let range =
        i64::from(PlaylistSettings::MIN_BATCH_SIZE)..=i64::from(PlaylistSettings::MAX_BATCH_SIZE);
    if !range.contains(&n) {
        return Err(ValidationError::BatchSizeOutOfRange(n));
    }
    // In range, so it fits
    Ok(n as u32)
}
