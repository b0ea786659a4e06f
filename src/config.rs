//! Configuration types for playlist-slicer

use crate::error::{Error, Result};
use crate::types::{FlowKind, PlaylistSettings};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// External extraction tool settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Explicit path to the extraction binary (auto-detected if None)
    #[serde(default)]
    pub binary_path: Option<PathBuf>,

    /// Binary name looked up in PATH (default: "yt-dlp")
    #[serde(default = "default_binary_name")]
    pub binary_name: String,

    /// Whether to search PATH if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Timeout for a quick, single-shot extraction (default: 30 seconds)
    #[serde(default = "default_quick_timeout", with = "duration_secs")]
    pub quick_timeout: Duration,

    /// Timeout when range and pacing were collected explicitly (default: 120 seconds)
    ///
    /// Larger ranges take proportionally longer, so the configured flow gets
    /// a more generous bound.
    #[serde(default = "default_configured_timeout", with = "duration_secs")]
    pub configured_timeout: Duration,

    /// Timeout for the `--version` presence probe (default: 10 seconds)
    #[serde(default = "default_probe_timeout", with = "duration_secs")]
    pub probe_timeout: Duration,

    /// Diagnostic text longer than this is truncated before reaching the user (default: 3000)
    #[serde(default = "default_max_diagnostic_chars")]
    pub max_diagnostic_chars: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            binary_name: default_binary_name(),
            search_path: true,
            quick_timeout: default_quick_timeout(),
            configured_timeout: default_configured_timeout(),
            probe_timeout: default_probe_timeout(),
            max_diagnostic_chars: default_max_diagnostic_chars(),
        }
    }
}

impl ToolConfig {
    /// Wall-clock bound for an extraction started by the given flow
    pub fn timeout_for(&self, kind: FlowKind) -> Duration {
        match kind {
            FlowKind::Quick => self.quick_timeout,
            FlowKind::Configured => self.configured_timeout,
        }
    }
}

/// Outbound message settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Pause after every progress notification (default: 1000 ms)
    #[serde(default = "default_pacing_delay", with = "duration_millis")]
    pub pacing_delay: Duration,

    /// Prefix the entry id is appended to (default: YouTube watch URL)
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,

    /// Send the title as its own message before the URL (default: true)
    #[serde(default = "default_true")]
    pub send_titles: bool,

    /// Optional message sent after every URL, e.g. a dash line
    #[serde(default)]
    pub separator: Option<String>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            pacing_delay: default_pacing_delay(),
            url_prefix: default_url_prefix(),
            send_titles: true,
            separator: None,
        }
    }
}

impl DeliveryConfig {
    /// Watch URL for an entry id
    pub fn entry_url(&self, id: &str) -> String {
        format!("{}{}", self.url_prefix, id)
    }
}

/// Dialog settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Batch size used by the quick flow (default: 50)
    #[serde(default = "default_batch_size")]
    pub default_batch_size: u32,

    /// Regexes a playlist reference must match (any one of them)
    #[serde(default = "default_url_patterns")]
    pub url_patterns: Vec<String>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            default_batch_size: default_batch_size(),
            url_patterns: default_url_patterns(),
        }
    }
}

/// Main configuration for the bot service
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Extraction tool settings
    #[serde(default)]
    pub tool: ToolConfig,

    /// Delivery settings
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Dialog settings
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl Config {
    /// Load a JSON configuration file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("tool.quick_timeout", self.tool.quick_timeout),
            ("tool.configured_timeout", self.tool.configured_timeout),
            ("tool.probe_timeout", self.tool.probe_timeout),
        ] {
            if value.is_zero() {
                return Err(Error::config(key, "timeout must be greater than zero"));
            }
        }

        if self.tool.binary_name.trim().is_empty() && self.tool.binary_path.is_none() {
            return Err(Error::config(
                "tool.binary_name",
                "either binary_name or binary_path must be set",
            ));
        }

        let batch = self.conversation.default_batch_size;
        if !(PlaylistSettings::MIN_BATCH_SIZE..=PlaylistSettings::MAX_BATCH_SIZE).contains(&batch) {
            return Err(Error::config(
                "conversation.default_batch_size",
                format!("batch size must be between 1 and 100, got {}", batch),
            ));
        }

        if self.conversation.url_patterns.is_empty() {
            return Err(Error::config(
                "conversation.url_patterns",
                "at least one playlist pattern is required",
            ));
        }
        self.compiled_url_patterns()?;

        Ok(())
    }

    /// Compile the playlist URL patterns
    pub fn compiled_url_patterns(&self) -> Result<Vec<Regex>> {
        self.conversation
            .url_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    Error::config(
                        "conversation.url_patterns",
                        format!("invalid pattern {:?}: {}", p, e),
                    )
                })
            })
            .collect()
    }
}

fn default_true() -> bool {
    true
}

fn default_binary_name() -> String {
    "yt-dlp".to_string()
}

fn default_quick_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_configured_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_diagnostic_chars() -> usize {
    3000
}

fn default_pacing_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_url_prefix() -> String {
    "https://www.youtube.com/watch?v=".to_string()
}

fn default_batch_size() -> u32 {
    50
}

fn default_url_patterns() -> Vec<String> {
    vec![
        r"^(https?://)?(www\.|m\.|music\.)?youtube\.com/playlist\?(\S*&)?list=[\w-]+".to_string(),
        r"^(https?://)?(www\.|m\.)?youtube\.com/watch\?(\S*&)?list=[\w-]+".to_string(),
        r"^(https?://)?youtu\.be/[\w-]+\?(\S*&)?list=[\w-]+".to_string(),
    ]
}

// Duration serialization helper (whole seconds)
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds)
mod duration_millis {
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
