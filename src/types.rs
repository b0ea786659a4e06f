//! Core types for playlist-slicer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of a chat user (one session per user)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which collection flow produced a request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// URL only, defaults for everything else
    Quick,
    /// Every parameter collected from the user
    Configured,
}

/// Upper bound of the requested playlist range
///
/// `Unbounded` replaces the magic "very large number" a user gets by answering 0,
/// so it can never be mistaken for a real index in range checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeEnd {
    /// Last item index, 1-based and inclusive
    Index(u32),
    /// No upper limit
    Unbounded,
}

impl RangeEnd {
    /// The bounded index, if any
    pub fn index(&self) -> Option<u32> {
        match self {
            RangeEnd::Index(i) => Some(*i),
            RangeEnd::Unbounded => None,
        }
    }
}

impl std::fmt::Display for RangeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeEnd::Index(i) => write!(f, "{}", i),
            RangeEnd::Unbounded => write!(f, "end"),
        }
    }
}

/// Finalized extraction parameters
///
/// Built once by the conversation state machine and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSettings {
    /// First item index (1-based)
    pub start: u32,
    /// Last item index or unbounded
    pub end: RangeEnd,
    /// Ask the tool for reverse playlist order
    pub reverse: bool,
    /// Entries between two progress notifications, in [1, 100]
    pub batch_size: u32,
}

impl PlaylistSettings {
    /// Smallest accepted batch size
    pub const MIN_BATCH_SIZE: u32 = 1;
    /// Largest accepted batch size
    pub const MAX_BATCH_SIZE: u32 = 100;

    /// Settings used by the quick flow
    pub fn quick(batch_size: u32) -> Self {
        Self {
            start: 1,
            end: RangeEnd::Unbounded,
            reverse: false,
            batch_size,
        }
    }
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self::quick(50)
    }
}

/// One parsed playlist item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque video identifier
    pub id: String,
    /// Video title, when the tool reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Entry {
    /// Create an entry without a title
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
        }
    }

    /// Attach a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Result of one extraction tool invocation
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Tool ran and exited cleanly; entries in emission order (possibly empty)
    Success(Vec<Entry>),
    /// Tool missing or not executable
    ToolUnavailable,
    /// Tool exited non-zero; carries its (possibly truncated) stderr
    ProcessFailed(String),
    /// Tool exceeded its wall-clock bound and was killed
    TimedOut,
}

impl ExtractionOutcome {
    /// Short label for logs and events
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ExtractionOutcome::Success(entries) => OutcomeKind::Success {
                entries: entries.len(),
            },
            ExtractionOutcome::ToolUnavailable => OutcomeKind::ToolUnavailable,
            ExtractionOutcome::ProcessFailed(_) => OutcomeKind::ProcessFailed,
            ExtractionOutcome::TimedOut => OutcomeKind::TimedOut,
        }
    }
}

/// Payload-free summary of an [`ExtractionOutcome`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OutcomeKind {
    /// Tool succeeded
    Success {
        /// Number of parsed entries
        entries: usize,
    },
    /// Tool missing
    ToolUnavailable,
    /// Tool exited non-zero
    ProcessFailed,
    /// Tool timed out
    TimedOut,
}

/// Events emitted by the bot service
///
/// Subscribers receive these through [`PlaylistBot::subscribe`](crate::PlaylistBot::subscribe).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A user entered a collection flow
    FlowStarted {
        /// User
        user: UserId,
        /// Which flow
        kind: FlowKind,
    },
    /// The extraction tool was launched
    ExtractionStarted {
        /// User
        user: UserId,
        /// Playlist reference
        url: String,
        /// Settings passed to the tool
        settings: PlaylistSettings,
    },
    /// The extraction tool finished
    ExtractionFinished {
        /// User
        user: UserId,
        /// Outcome summary
        outcome: OutcomeKind,
        /// Wall-clock time of the invocation
        #[serde(with = "millis")]
        elapsed: Duration,
    },
    /// A batch boundary was reached during delivery
    BatchDelivered {
        /// User
        user: UserId,
        /// Entries sent so far
        delivered: usize,
        /// Entries in total
        total: usize,
    },
    /// The user's session was discarded and is Idle again
    SessionCleared {
        /// User
        user: UserId,
    },
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
