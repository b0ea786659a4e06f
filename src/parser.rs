//! Line-oriented parsing of extraction tool output
//!
//! The tool prints one JSON object per playlist item on stdout, but warnings and
//! progress noise can end up interleaved with it. Anything that is not an object
//! with an `id` is skipped without complaint.

use crate::types::Entry;
use serde_json::Value;

/// Parse one line of tool output into an [`Entry`]
///
/// Returns `None` for blank lines, non-JSON text, JSON that is not an object,
/// and objects without a usable `id`. Numeric ids are accepted and rendered
/// as strings. A `title` that is missing, `null`, or not a string is dropped.
///
/// # Examples
///
/// ```
/// use playlist_slicer::parser::parse_record;
///
/// let entry = parse_record(r#"{"id": "abc123", "title": "Intro"}"#).unwrap();
/// assert_eq!(entry.id, "abc123");
/// assert_eq!(entry.title.as_deref(), Some("Intro"));
///
/// assert!(parse_record("WARNING: unable to download webpage").is_none());
/// ```
pub fn parse_record(line: &str) -> Option<Entry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            tracing::trace!(error = %e, "skipping non-JSON output line");
            return None;
        }
    };

    let object = value.as_object()?;
    let id = match object.get("id")? {
        Value::String(s) if !s.trim().is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let title = object
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_owned);

    Some(Entry { id, title })
}

/// Parse a whole stdout buffer, keeping emission order
pub fn parse_output(stdout: &str) -> Vec<Entry> {
    stdout.lines().filter_map(parse_record).collect()
}
