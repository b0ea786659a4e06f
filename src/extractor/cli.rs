//! CLI-based extractor using an external yt-dlp compatible binary

use super::args::{VERSION, build_extraction_args};
use super::traits::PlaylistExtractor;
use crate::parser::parse_output;
use crate::types::{ExtractionOutcome, PlaylistSettings};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_DIAGNOSTIC_CHARS: usize = 3000;

/// Extractor that runs an external binary
///
/// Every child process is spawned with `kill_on_drop`, so when a timeout drops
/// the pending output future the process is killed instead of left running.
/// On unix the tool also gets its own process group, and a timeout kills the
/// whole group. The presence probe and the extraction share one timeout.
///
/// # Examples
///
/// ```no_run
/// use playlist_slicer::extractor::CliExtractor;
/// use std::path::PathBuf;
///
/// // Explicit path
/// let extractor = CliExtractor::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let extractor = CliExtractor::from_path("yt-dlp").expect("yt-dlp not found in PATH");
/// ```
pub struct CliExtractor {
    binary_path: PathBuf,
    probe_timeout: Duration,
    max_diagnostic_chars: usize,
}

impl CliExtractor {
    /// Create a new CLI extractor with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_diagnostic_chars: DEFAULT_MAX_DIAGNOSTIC_CHARS,
        }
    }

    /// Attempt to find `binary_name` in PATH
    ///
    /// Returns `None` when the `which` lookup fails.
    pub fn from_path(binary_name: &str) -> Option<Self> {
        which::which(binary_name).ok().map(Self::new)
    }

    /// Bound for the `--version` presence probe
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Diagnostic text beyond this many characters is cut off
    pub fn with_max_diagnostic_chars(mut self, max: usize) -> Self {
        self.max_diagnostic_chars = max;
        self
    }

    /// Path of the binary this extractor runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Check that the binary exists and answers `--version` successfully
    pub async fn probe(&self) -> bool {
        let mut command = Command::new(&self.binary_path);
        command
            .arg(VERSION)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(self.probe_timeout, command.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                tracing::debug!(
                    binary = ?self.binary_path,
                    version = %String::from_utf8_lossy(&output.stdout).trim(),
                    "extraction tool present"
                );
                true
            }
            Ok(Ok(output)) => {
                tracing::warn!(
                    binary = ?self.binary_path,
                    code = ?output.status.code(),
                    "extraction tool probe exited with failure"
                );
                false
            }
            Ok(Err(e)) => {
                tracing::warn!(binary = ?self.binary_path, error = %e, "failed to run extraction tool probe");
                false
            }
            Err(_) => {
                tracing::warn!(binary = ?self.binary_path, timeout = ?self.probe_timeout, "extraction tool probe timed out");
                false
            }
        }
    }
}

#[async_trait]
impl PlaylistExtractor for CliExtractor {
    async fn extract(
        &self,
        url: &str,
        settings: &PlaylistSettings,
        timeout: Duration,
    ) -> ExtractionOutcome {
        // `timeout` bounds the probe and the extraction together
        let deadline = tokio::time::Instant::now() + timeout;

        match tokio::time::timeout_at(deadline, self.probe()).await {
            Ok(true) => {}
            Ok(false) => return ExtractionOutcome::ToolUnavailable,
            Err(_) => {
                tracing::warn!(url = %url, timeout = ?timeout, "extraction tool probe used up the timeout");
                return ExtractionOutcome::TimedOut;
            }
        }

        let args = build_extraction_args(url, settings);
        tracing::debug!(binary = ?self.binary_path, args = ?args, "running extraction tool");

        let mut command = Command::new(&self.binary_path);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so helpers the tool forks can be killed with it
        #[cfg(unix)]
        command.process_group(0);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(binary = ?self.binary_path, error = %e, "failed to spawn extraction tool");
                return ExtractionOutcome::ToolUnavailable;
            }
        };
        #[cfg(unix)]
        let pid = child.id();

        let started = Instant::now();
        // Dropping the future on timeout drops the child, which kills it.
        match tokio::time::timeout_at(deadline, child.wait_with_output()).await {
            Err(_) => {
                #[cfg(unix)]
                if let Some(pid) = pid {
                    kill_process_group(pid);
                }
                tracing::warn!(url = %url, timeout = ?timeout, "extraction tool timed out, process killed");
                ExtractionOutcome::TimedOut
            }
            Ok(Err(e)) => {
                tracing::warn!(url = %url, error = %e, "failed to collect extraction tool output");
                ExtractionOutcome::ProcessFailed(format!("failed to read tool output: {}", e))
            }
            Ok(Ok(output)) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let diagnostic = if stderr.trim().is_empty() {
                    format!("extraction tool exited with {}", output.status)
                } else {
                    truncate_diagnostic(&stderr, self.max_diagnostic_chars)
                };
                tracing::warn!(
                    url = %url,
                    code = ?output.status.code(),
                    stderr_bytes = output.stderr.len(),
                    "extraction tool failed"
                );
                ExtractionOutcome::ProcessFailed(diagnostic)
            }
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let entries = parse_output(&stdout);
                tracing::info!(
                    url = %url,
                    entries = entries.len(),
                    elapsed = ?started.elapsed(),
                    "extraction tool finished"
                );
                ExtractionOutcome::Success(entries)
            }
        }
    }

    fn name(&self) -> &'static str {
        "cli"
    }
}

/// SIGKILL every process in the group led by `pid`
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: kill(2) takes plain integers and touches no memory owned by
    // this process. A negative pid addresses the process group `pgid`,
    // which the child leads because it was spawned with `process_group(0)`.
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        tracing::debug!(
            pgid,
            error = %std::io::Error::last_os_error(),
            "extraction tool process group already gone"
        );
    }
}

/// Trim and cut `text` to at most `max_chars` characters, marking the cut
pub(crate) fn truncate_diagnostic(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
