//! Per-user parameter collection
//!
//! Each user has at most one [`Session`]. A session walks a strictly linear
//! sequence of stages; invalid replies re-prompt and leave the stage (and
//! everything collected so far) untouched.
//!
//! ```text
//! Idle ──/quick, /configure──▶ AwaitingUrl ──quick──────────────────────────────┐
//!                                   │                                            ▼
//!                                   └─▶ AwaitingStart ─▶ AwaitingEnd ─▶ AwaitingReverse
//!                                                                               │
//!                              Extracting ◀── AwaitingBatchSize ◀───────────────┘
//!                                   │
//!                                   └──(any outcome)──▶ Idle
//! ```
//!
//! [`Session::advance`] is a pure transition function; [`SessionStore`] applies
//! it atomically per user.

mod store;
mod validate;

pub use store::SessionStore;
pub use validate::{
    PlaylistUrlMatcher, parse_batch_size, parse_direction, parse_end, parse_start,
};

use crate::error::ValidationError;
use crate::messages;
use crate::types::{FlowKind, PlaylistSettings, RangeEnd};
use serde::{Deserialize, Serialize};

/// Position of a session in the collection sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No flow in progress
    #[default]
    Idle,
    /// Waiting for the playlist reference
    AwaitingUrl,
    /// Waiting for the first index
    AwaitingStart,
    /// Waiting for the last index (0 = unbounded)
    AwaitingEnd,
    /// Waiting for "forward" or "reverse"
    AwaitingReverse,
    /// Waiting for the batch size
    AwaitingBatchSize,
    /// Settings finalized, extraction and delivery running
    Extracting,
}

/// Settings collected so far in the configured flow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsDraft {
    /// Accepted start index
    pub start: Option<u32>,
    /// Accepted end bound
    pub end: Option<RangeEnd>,
    /// Accepted direction
    pub reverse: Option<bool>,
    /// Accepted batch size
    pub batch_size: Option<u32>,
}

/// Everything needed to run one extraction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionJob {
    /// Validated playlist reference
    pub url: String,
    /// Finalized settings
    pub settings: PlaylistSettings,
    /// Flow that produced the job (selects the timeout)
    pub kind: FlowKind,
}

/// What the caller should do after a reply was applied
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Reply accepted; ask the next question
    Prompt(&'static str),
    /// Reply rejected; stage unchanged
    Reprompt(ValidationError),
    /// Settings complete; session is now [`Stage::Extracting`]
    Extract(ExtractionJob),
    /// Extraction already running for this user; nothing changed
    Busy,
    /// Idle and the text is not a playlist reference; nothing changed
    Usage,
}

/// One user's dialog state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    stage: Stage,
    is_quick: bool,
    playlist_url: Option<String>,
    draft: SettingsDraft,
}

impl Session {
    /// Fresh session waiting for a URL
    pub fn start(kind: FlowKind) -> Self {
        Self {
            stage: Stage::AwaitingUrl,
            is_quick: kind == FlowKind::Quick,
            ..Default::default()
        }
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Whether the quick flow was chosen
    pub fn is_quick(&self) -> bool {
        self.is_quick
    }

    /// Playlist reference, once accepted
    pub fn playlist_url(&self) -> Option<&str> {
        self.playlist_url.as_deref()
    }

    /// Settings collected so far
    pub fn draft(&self) -> &SettingsDraft {
        &self.draft
    }

    fn kind(&self) -> FlowKind {
        if self.is_quick {
            FlowKind::Quick
        } else {
            FlowKind::Configured
        }
    }

    /// Apply one user reply
    ///
    /// `default_batch_size` is used when the quick flow finalizes settings.
    pub fn advance(
        &mut self,
        text: &str,
        urls: &PlaylistUrlMatcher,
        default_batch_size: u32,
    ) -> Transition {
        match self.stage {
            Stage::Idle => {
                // A bare playlist link while idle is an implicit quick request
                if !urls.matches(text) {
                    return Transition::Usage;
                }
                *self = Session::start(FlowKind::Quick);
                self.advance(text, urls, default_batch_size)
            }
            Stage::AwaitingUrl => match urls.validate(text) {
                Ok(url) => {
                    self.playlist_url = Some(url);
                    if self.is_quick {
                        let settings = PlaylistSettings::quick(default_batch_size);
                        self.begin_extraction(settings)
                    } else {
                        self.stage = Stage::AwaitingStart;
                        Transition::Prompt(messages::ASK_START)
                    }
                }
                Err(e) => Transition::Reprompt(e),
            },
            Stage::AwaitingStart => match parse_start(text) {
                Ok(start) => {
                    self.draft.start = Some(start);
                    self.stage = Stage::AwaitingEnd;
                    Transition::Prompt(messages::ASK_END)
                }
                Err(e) => Transition::Reprompt(e),
            },
            Stage::AwaitingEnd => match parse_end(text, self.draft.start.unwrap_or(1)) {
                Ok(end) => {
                    self.draft.end = Some(end);
                    self.stage = Stage::AwaitingReverse;
                    Transition::Prompt(messages::ASK_ORDER)
                }
                Err(e) => Transition::Reprompt(e),
            },
            Stage::AwaitingReverse => match parse_direction(text) {
                Ok(reverse) => {
                    self.draft.reverse = Some(reverse);
                    self.stage = Stage::AwaitingBatchSize;
                    Transition::Prompt(messages::ASK_BATCH_SIZE)
                }
                Err(e) => Transition::Reprompt(e),
            },
            Stage::AwaitingBatchSize => match parse_batch_size(text) {
                Ok(batch_size) => {
                    self.draft.batch_size = Some(batch_size);
                    let settings = PlaylistSettings {
                        start: self.draft.start.unwrap_or(1),
                        end: self.draft.end.unwrap_or(RangeEnd::Unbounded),
                        reverse: self.draft.reverse.unwrap_or(false),
                        batch_size,
                    };
                    self.begin_extraction(settings)
                }
                Err(e) => Transition::Reprompt(e),
            },
            Stage::Extracting => Transition::Busy,
        }
    }

    fn begin_extraction(&mut self, settings: PlaylistSettings) -> Transition {
        self.stage = Stage::Extracting;
        Transition::Extract(ExtractionJob {
            url: self.playlist_url.clone().unwrap_or_default(),
            settings,
            kind: self.kind(),
        })
    }
}
