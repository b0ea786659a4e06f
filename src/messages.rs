//! User-facing texts

use crate::error::ValidationError;
use crate::types::PlaylistSettings;

/// Reply to `/start`
pub const GREETING: &str = "Hi! Send me a link to a YouTube playlist and I will slice it into separate video links.\n\nUse /quick for the whole playlist or /configure to choose a range, order, and batch size.";

/// Reply to `/help` and to idle text that is not a playlist link
pub const USAGE: &str = "Commands:\n/quick - send a playlist link, get every video\n/configure - choose start, end, order, and batch size\n/help - show this message\n\nYou can also just paste a playlist link.";

/// Asked when a flow starts
pub const ASK_URL: &str = "Send me the playlist link.";

/// Asked after the URL in the configured flow
pub const ASK_START: &str = "From which video should I start? Send a number (1 = first).";

/// Asked after the start index
pub const ASK_END: &str = "At which video should I stop? Send a number, or 0 for the end of the playlist.";

/// Token selecting playlist order
pub const FORWARD: &str = "forward";

/// Token selecting reverse playlist order
pub const REVERSE: &str = "reverse";

/// Asked after the end index
pub const ASK_ORDER: &str = "In which order? Reply \"forward\" or \"reverse\".";

/// Asked last in the configured flow
pub const ASK_BATCH_SIZE: &str = "How many links per batch? Send a number from 1 to 100.";

/// Sent right before the tool runs
pub const FETCHING: &str = "🔍 Fetching the video list...";

/// Sent when a message arrives while extraction is still running
pub const BUSY: &str = "⏳ Still working on your previous playlist, please wait.";

/// Extraction binary missing
pub const TOOL_UNAVAILABLE: &str = "❌ Error: the extraction tool is not installed on the server.";

/// Extraction timed out
pub const TIMED_OUT: &str = "❌ The request timed out. Please try again.";

/// Zero entries
pub const NOTHING_FOUND: &str = "❌ No videos found in the playlist.";

/// Delivery aborted by a transport failure
pub const DELIVERY_FAILED: &str = "❌ Something went wrong while sending the links.";

/// Extraction tool reported an error
pub fn process_failed(diagnostic: &str) -> String {
    format!("❌ Error while processing the playlist: {}", diagnostic)
}

/// Final confirmation
pub fn found(count: usize) -> String {
    format!("✅ Found {} videos!", count)
}

/// Sent after every completed batch
pub fn progress(delivered: usize, total: usize) -> String {
    format!("📦 Sent {} of {} videos...", delivered, total)
}

/// Echoed back before extraction in the configured flow
pub fn settings_summary(settings: &PlaylistSettings) -> String {
    format!(
        "Settings: videos {}..{}, {} order, batches of {}.",
        settings.start,
        settings.end,
        if settings.reverse { REVERSE } else { FORWARD },
        settings.batch_size
    )
}

/// Re-prompt for a rejected reply
pub fn reprompt(error: &ValidationError) -> String {
    match error {
        ValidationError::NotAPlaylist => {
            "❌ That does not look like a YouTube playlist link. Try again.".to_string()
        }
        ValidationError::NotANumber(_) => "❌ Please send a whole number.".to_string(),
        ValidationError::StartTooLarge(_) => {
            "❌ That start is past the end of any playlist. Send a smaller number.".to_string()
        }
        ValidationError::StartOutOfRange(_) => {
            "❌ The start must be 1 or greater.".to_string()
        }
        ValidationError::NegativeEnd(_) => {
            "❌ The end cannot be negative. Send 0 for the end of the playlist.".to_string()
        }
        ValidationError::EndBeforeStart { start, .. } => format!(
            "❌ The end must be {} or greater (or 0 for the end of the playlist).",
            start
        ),
        ValidationError::UnknownDirection(_) => {
            format!("❌ Reply \"{}\" or \"{}\".", FORWARD, REVERSE)
        }
        ValidationError::BatchSizeOutOfRange(_) => {
            "❌ The batch size must be between 1 and 100.".to_string()
        }
    }
}
