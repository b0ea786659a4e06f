//! Pacing between delivery batches
//!
//! Chat platforms throttle bots that send bursts of messages. The delivery
//! pipeline calls [`Pacer::pause`] after every progress notification; the
//! production pacer sleeps for a fixed delay, tests plug in [`NoPacer`].

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Strategy for waiting between batches
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait before the next batch is sent
    ///
    /// Must be a cooperative suspension point: other sessions keep running
    /// while one is paused.
    async fn pause(&self);
}

/// Sleeps for a fixed delay on every pause
///
/// The delay can be changed at runtime; clones share it.
///
/// # Examples
///
/// ```
/// use playlist_slicer::delivery::SleepPacer;
/// use std::time::Duration;
///
/// let pacer = SleepPacer::new(Duration::from_secs(1));
/// pacer.set_delay(Duration::from_millis(500));
/// assert_eq!(pacer.delay(), Duration::from_millis(500));
/// ```
#[derive(Clone, Debug)]
pub struct SleepPacer {
    /// Delay in milliseconds (0 = no pause)
    delay_ms: Arc<AtomicU64>,
}

impl SleepPacer {
    /// Create a pacer with the given delay
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: Arc::new(AtomicU64::new(delay.as_millis() as u64)),
        }
    }

    /// Replace the delay; takes effect on the next pause
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms
            .store(delay.as_millis() as u64, Ordering::Relaxed);
    }

    /// Current delay
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::Relaxed))
    }
}

#[async_trait]
impl Pacer for SleepPacer {
    async fn pause(&self) {
        let delay = self.delay();
        // Fast path: pacing disabled
        if delay.is_zero() {
            return;
        }
        tokio::time::sleep(delay).await;
    }
}

/// Never waits
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacer;

#[async_trait]
impl Pacer for NoPacer {
    async fn pause(&self) {}
}
