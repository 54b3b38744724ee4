//! Configuration file parser for ~/.config/reelfeed/config.toml.
//!
//! The config file is optional. A missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, but we log a warning for each one since
//! they are usually typos.
use crate::feed::{FeedSettings, DEFAULT_BATCH_SIZE};
use crate::util::{validate_share_base, UrlValidationError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid share_base_url: {0}")]
    ShareBase(#[from] UrlValidationError),

    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video catalog file. `None` means `videos.json` in the config directory.
    pub catalog: Option<PathBuf>,

    /// Reels shown before any scrolling.
    pub initial_batch: usize,

    /// Reels added per lazy-load batch.
    pub batch_size: usize,

    /// Simulated latency of a lazy-load batch, in milliseconds.
    pub load_delay_ms: u64,

    /// Rows from the end of the content at which the next batch is requested.
    pub load_threshold: u32,

    pub scroll_throttle_ms: u64,

    /// How long the like/mute flash stays on screen, in milliseconds.
    pub feedback_ms: u64,

    pub start_muted: bool,

    /// Prefix of the card label, rendered as `{label_prefix} id: {id}`.
    pub label_prefix: String,

    /// Share links are this URL with the reel id appended.
    pub share_base_url: String,
    pub share_title: String,
    pub share_text: String,

    /// Native share command. Placeholders: `{url}`, `{title}`, `{text}`.
    /// When unset, sharing copies the link to the clipboard.
    pub share_command: Option<Vec<String>>,

    /// External player argv. `{url}` is replaced with the reel source.
    pub player_command: Vec<String>,

    /// Extra player arguments when muted, inserted after the program name.
    pub mute_args: Vec<String>,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            initial_batch: DEFAULT_BATCH_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            load_delay_ms: 1000,
            load_threshold: 1,
            scroll_throttle_ms: 200,
            feedback_ms: 1000,
            start_muted: true,
            label_prefix: "#CASINOW3W".to_string(),
            share_base_url: "https://tv.casinow3w.com/video/".to_string(),
            share_title: "Check out this Casino reel!".to_string(),
            share_text: "Check out this Casino video reel on CASINOW3W!".to_string(),
            share_command: None,
            player_command: ["mpv", "--loop=inf", "--really-quiet", "--no-terminal", "{url}"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            mute_args: vec!["--mute=yes".to_string()],
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: &'static [&'static str] = &[
        "catalog",
        "initial_batch",
        "batch_size",
        "load_delay_ms",
        "load_threshold",
        "scroll_throttle_ms",
        "feedback_ms",
        "start_muted",
        "label_prefix",
        "share_base_url",
        "share_title",
        "share_text",
        "share_command",
        "player_command",
        "mute_args",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse config from TOML text and check value ranges.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.initial_batch == 0 {
            return Err(ConfigError::Invalid {
                key: "initial_batch",
                reason: "must be at least 1".into(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: "batch_size",
                reason: "must be at least 1".into(),
            });
        }
        if self.player_command.is_empty() {
            return Err(ConfigError::Invalid {
                key: "player_command",
                reason: "must name a program".into(),
            });
        }
        if self.share_command.as_ref().is_some_and(|c| c.is_empty()) {
            return Err(ConfigError::Invalid {
                key: "share_command",
                reason: "must name a program, or be omitted".into(),
            });
        }
        Ok(())
    }

    /// Catalog path, falling back to `videos.json` under `config_dir`.
    pub fn catalog_path(&self, config_dir: &Path) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| config_dir.join("videos.json"))
    }

    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }

    /// Feed controller tunables.
    pub fn feed_settings(&self) -> Result<FeedSettings, ConfigError> {
        let mut settings = FeedSettings::new(validate_share_base(&self.share_base_url)?);
        settings.initial_batch = self.initial_batch;
        settings.batch_size = self.batch_size;
        settings.load_delay = Duration::from_millis(self.load_delay_ms);
        settings.load_threshold = self.load_threshold;
        settings.scroll_throttle = Duration::from_millis(self.scroll_throttle_ms);
        settings.start_muted = self.start_muted;
        settings.share_title = self.share_title.clone();
        settings.share_text = self.share_text.clone();
        Ok(settings)
    }
}

// ============================================================================
// Tests
// ============================================================================
