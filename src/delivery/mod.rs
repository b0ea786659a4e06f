//! Batched, paced delivery of extracted entries
//!
//! [`DeliveryPipeline::deliver`] sends each entry as its own message (title
//! first when known), a progress notification after every `batch_size`
//! entries followed by a [`Pacer`] pause, and a closing summary. Entries are
//! sent in exactly the order received; the pipeline never reorders.

mod pacing;
mod sink;

pub use pacing::{NoPacer, Pacer, SleepPacer};
pub use sink::{MemorySink, MessageSink};

use crate::config::DeliveryConfig;
use crate::error::Result;
use crate::messages;
use crate::types::{Entry, Event, UserId};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Counts reported after a delivery run
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Entries sent
    pub delivered: usize,
    /// Progress notifications sent
    pub batches: usize,
}

/// Sends entries to a user through a [`MessageSink`]
#[derive(Clone)]
pub struct DeliveryPipeline {
    sink: Arc<dyn MessageSink>,
    pacer: Arc<dyn Pacer>,
    config: DeliveryConfig,
    event_tx: broadcast::Sender<Event>,
}

impl DeliveryPipeline {
    /// Create a pipeline
    pub fn new(
        sink: Arc<dyn MessageSink>,
        pacer: Arc<dyn Pacer>,
        config: DeliveryConfig,
        event_tx: broadcast::Sender<Event>,
    ) -> Self {
        Self {
            sink,
            pacer,
            config,
            event_tx,
        }
    }

    /// Deliver `entries` to `user`
    ///
    /// A `batch_size` of 0 is treated as 1.
    ///
    /// # Errors
    ///
    /// Stops at the first transport error and returns it; entries already
    /// sent stay sent.
    pub async fn deliver(
        &self,
        user: UserId,
        entries: &[Entry],
        batch_size: u32,
    ) -> Result<DeliveryReport> {
        let total = entries.len();
        let batch_size = batch_size.max(1) as usize;
        let mut batches = 0;

        for (index, entry) in entries.iter().enumerate() {
            let title = entry
                .title
                .as_deref()
                .filter(|t| self.config.send_titles && !t.trim().is_empty());
            if let Some(title) = title {
                self.sink.send(user, title.to_string()).await?;
            }
            self.sink
                .send(user, self.config.entry_url(&entry.id))
                .await?;
            if let Some(ref separator) = self.config.separator {
                self.sink.send(user, separator.clone()).await?;
            }

            let delivered = index + 1;
            if delivered % batch_size == 0 {
                self.sink
                    .send(user, messages::progress(delivered, total))
                    .await?;
                batches += 1;
                self.event_tx
                    .send(Event::BatchDelivered {
                        user,
                        delivered,
                        total,
                    })
                    .ok();
                tracing::debug!(user = %user, delivered, total, "batch delivered, pacing");
                self.pacer.pause().await;
            }
        }

        let summary = if total == 0 {
            messages::NOTHING_FOUND.to_string()
        } else {
            messages::found(total)
        };
        self.sink.send(user, summary).await?;

        Ok(DeliveryReport {
            delivered: total,
            batches,
        })
    }
}
