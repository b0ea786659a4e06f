//! Outbound message transport abstraction

use crate::error::Result;
use crate::types::UserId;
use async_trait::async_trait;
use std::sync::Mutex;

/// Where outbound texts go
///
/// The chat transport implements this; the core only needs "send this text to
/// this user, in order". A call returns once the message has been handed over,
/// so awaiting sends one after another preserves per-user ordering.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send one plain-text message
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) when the transport
    /// rejects the message.
    async fn send(&self, user: UserId, text: String) -> Result<()>;
}

/// In-memory sink that records every message
///
/// Useful for embedding the bot behind a custom transport that polls for
/// output, and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    sent: Mutex<Vec<(UserId, String)>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message in send order
    pub fn all(&self) -> Vec<(UserId, String)> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Messages sent to one user, in order
    pub fn messages_for(&self, user: UserId) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, text)| text)
            .collect()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<(UserId, String)> {
        std::mem::take(
            &mut *self
                .sent
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

#[async_trait]
impl MessageSink for MemorySink {
    async fn send(&self, user: UserId, text: String) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((user, text));
        Ok(())
    }
}
