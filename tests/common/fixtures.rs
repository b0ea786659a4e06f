//! Scripted extractors and tool output fixtures

use async_trait::async_trait;
use playlist_slicer::{Entry, ExtractionOutcome, PlaylistExtractor, PlaylistSettings};
use std::sync::Mutex;
use std::time::Duration;

/// Playlist URL accepted by the default patterns
pub const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PLtest123";

/// Flat-playlist output for ids a, b, c with one title
pub const THREE_RECORDS: &str = concat!(
    r#"{"_type":"url","id":"a","title":"First"}"#,
    "\n",
    r#"{"_type":"url","id":"b"}"#,
    "\n",
    "not json at all\n",
    r#"{"_type":"url","id":"c"}"#,
    "\n",
);

/// Entries without titles
pub fn entries(ids: &[&str]) -> Vec<Entry> {
    ids.iter().map(|id| Entry::new(*id)).collect()
}

/// One recorded extractor call
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub settings: PlaylistSettings,
    pub timeout: Duration,
}

/// Extractor returning a fixed outcome, optionally after a delay
pub struct ScriptedExtractor {
    outcome: ExtractionOutcome,
    delay: Duration,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExtractor {
    pub fn new(outcome: ExtractionOutcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            calls: Mutex::new(vec![]),
        }
    }

    pub fn succeeding(ids: &[&str]) -> Self {
        Self::new(ExtractionOutcome::Success(entries(ids)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaylistExtractor for ScriptedExtractor {
    async fn extract(
        &self,
        url: &str,
        settings: &PlaylistSettings,
        timeout: Duration,
    ) -> ExtractionOutcome {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            settings: *settings,
            timeout,
        });
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Write an executable shell script standing in for the extraction tool
///
/// The script answers `--version` with exit 0, then runs `body` for real
/// invocations. `$ARGS_FILE` (next to the script) receives the arguments.
#[cfg(unix)]
pub fn write_tool_script(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-yt-dlp");
    let args_file = dir.join("args.txt");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo 2024.01.01; exit 0; fi\nprintf '%s\\n' \"$@\" > '{}'\n{}\n",
        args_file.display(),
        body
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
