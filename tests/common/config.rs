//! Helpers for building a bot wired to in-memory collaborators

use playlist_slicer::{Config, MemorySink, NoPacer, PlaylistBot, PlaylistExtractor};
use std::sync::Arc;

/// Bot plus the sink it writes to
pub struct Harness {
    pub bot: PlaylistBot,
    pub sink: Arc<MemorySink>,
}

/// Default config with pacing removed
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.delivery.pacing_delay = std::time::Duration::ZERO;
    config
}

/// Build a bot over `extractor` with a [`MemorySink`] and no pacing
pub fn harness(extractor: Arc<dyn PlaylistExtractor>) -> Harness {
    harness_with_config(test_config(), extractor)
}

/// Same as [`harness`] with a custom config
pub fn harness_with_config(config: Config, extractor: Arc<dyn PlaylistExtractor>) -> Harness {
    let sink = Arc::new(MemorySink::new());
    let bot = PlaylistBot::new(config, extractor, sink.clone(), Arc::new(NoPacer))
        .expect("test config should be valid");
    Harness { bot, sink }
}
