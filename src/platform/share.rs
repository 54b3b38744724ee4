//! Share links through a native share command or the clipboard.

use std::process::{Command, Stdio};
use thiserror::Error;
use url::Url;

/// Notification shown after the clipboard fallback succeeds.
pub const COPIED_NOTICE: &str = "Link copied to clipboard!";

/// What gets shared for a reel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Url,
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share command is empty")]
    NoCommand,

    #[error("failed to start share command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

/// A platform "share sheet".
pub trait NativeShare {
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError>;
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError>;
}

/// Result of a share request, as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the native share capability.
    Shared,
    /// No native share; the URL went to the clipboard.
    Copied,
    /// Share or clipboard failed. Already logged; nothing to show.
    Failed,
}

impl ShareOutcome {
    /// The one-time notification to show the user, if any.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            Self::Copied => Some(COPIED_NOTICE),
            Self::Shared | Self::Failed => None,
        }
    }
}

/// Native share if configured, clipboard otherwise.
pub struct Sharer {
    native: Option<Box<dyn NativeShare>>,
    clipboard: Box<dyn Clipboard>,
}

impl Sharer {
    pub fn new(native: Option<Box<dyn NativeShare>>, clipboard: Box<dyn Clipboard>) -> Self {
        Self { native, clipboard }
    }

    /// Share `payload`. Never fails outright: errors are logged and reported
    /// as [`ShareOutcome::Failed`].
    pub fn share(&mut self, payload: &SharePayload) -> ShareOutcome {
        if let Some(native) = self.native.as_mut() {
            return match native.share(payload) {
                Ok(()) => {
                    tracing::info!(url = %payload.url, "Shared via native share");
                    ShareOutcome::Shared
                }
                Err(e) => {
                    tracing::warn!(url = %payload.url, error = %e, "Share failed");
                    ShareOutcome::Failed
                }
            };
        }

        match self.clipboard.write_text(payload.url.as_str()) {
            Ok(()) => {
                tracing::info!(url = %payload.url, "Share link copied to clipboard");
                ShareOutcome::Copied
            }
            Err(e) => {
                tracing::warn!(url = %payload.url, error = %e, "Clipboard write failed");
                ShareOutcome::Failed
            }
        }
    }
}

// ============================================================================
// Command-based native share
// ============================================================================

/// Runs a user-configured command as the share sheet.
///
/// The argv template may use `{url}`, `{title}` and `{text}`. The command is
/// spawned and reaped in the background; a non-zero exit is logged only.
#[derive(Debug, Clone)]
pub struct CommandShare {
    command: Vec<String>,
}

impl CommandShare {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl NativeShare for CommandShare {
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError> {
        let argv = super::expand_args(
            &self.command,
            &[
                ("url", payload.url.as_str()),
                ("title", &payload.title),
                ("text", &payload.text),
            ],
        );
        let (program, args) = argv.split_first().ok_or(ShareError::NoCommand)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ShareError::Spawn {
                program: program.clone(),
                source,
            })?;

        let program = program.clone();
        let mut reap = move || match child.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!(program = %program, %status, "Share command exited with failure");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(program = %program, error = %e, "Failed to wait for share command"),
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(reap);
            }
            Err(_) => reap(),
        }
        Ok(())
    }
}

// ============================================================================
// System clipboard
// ============================================================================

/// The desktop clipboard, opened on first use.
///
/// The handle is kept for the life of the app: on X11 the copied text is only
/// served while the owning handle exists.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
        if self.inner.is_none() {
            let opened =
                arboard::Clipboard::new().map_err(|e| ShareError::Clipboard(e.to_string()))?;
            self.inner = Some(opened);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ShareError::Clipboard("clipboard not open".into()));
        };
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| ShareError::Clipboard(e.to_string()))
    }
}
