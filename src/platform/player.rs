//! Media playback backends.

use crate::catalog::VideoEntry;
use std::process::{Child, Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no player command configured")]
    NoCommand,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Playback handle for one reel.
pub trait MediaPlayer {
    /// Start (or keep) playing. Errors leave the player paused.
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
    fn is_playing(&self) -> bool;
}

/// Creates a player per catalog entry.
pub trait PlayerBackend {
    fn create(&self, entry: &VideoEntry, muted: bool) -> Box<dyn MediaPlayer>;
}

// ============================================================================
// External process player
// ============================================================================

/// Launches an external player (mpv by default) for each active reel.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    command: Vec<String>,
    mute_args: Vec<String>,
}

impl ProcessBackend {
    /// `command` is an argv template; `{url}` is replaced with the video source.
    /// `mute_args` are inserted after the program name while muted.
    pub fn new(command: Vec<String>, mute_args: Vec<String>) -> Self {
        Self { command, mute_args }
    }
}

impl PlayerBackend for ProcessBackend {
    fn create(&self, entry: &VideoEntry, muted: bool) -> Box<dyn MediaPlayer> {
        let argv = super::expand_args(&self.command, &[("url", entry.src.as_str())]);
        Box::new(ProcessPlayer {
            id: entry.id.clone(),
            argv,
            mute_args: self.mute_args.clone(),
            muted,
            child: None,
        })
    }
}

/// Pausing stops the process; playing again restarts the clip.
struct ProcessPlayer {
    id: String,
    argv: Vec<String>,
    mute_args: Vec<String>,
    muted: bool,
    child: Option<Child>,
}

impl ProcessPlayer {
    fn spawn(&mut self) -> Result<Child, PlaybackError> {
        let (program, rest) = self.argv.split_first().ok_or(PlaybackError::NoCommand)?;
        let mut cmd = Command::new(program);
        if self.muted {
            cmd.args(&self.mute_args);
        }
        cmd.args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        cmd.spawn().map_err(|source| PlaybackError::Spawn {
            program: program.clone(),
            source,
        })
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                tracing::debug!(id = %self.id, error = %e, "Player already exited");
            }
            let id = self.id.clone();
            let mut reap = move || {
                if let Err(e) = child.wait() {
                    tracing::warn!(id = %id, error = %e, "Failed to reap player process");
                }
            };
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn_blocking(reap);
                }
                Err(_) => reap(),
            }
        }
    }
}

impl MediaPlayer for ProcessPlayer {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if let Some(child) = self.child.as_mut() {
            if matches!(child.try_wait(), Ok(None)) {
                return Ok(());
            }
            self.child = None;
        }
        let child = self.spawn()?;
        tracing::debug!(id = %self.id, pid = child.id(), muted = self.muted, "Player started");
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) {
        self.stop();
    }

    fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        // The external player takes mute as a launch flag, so restart it
        if self.child.is_some() {
            self.stop();
            if let Err(e) = self.play() {
                tracing::warn!(id = %self.id, error = %e, "Player restart after mute change failed");
            }
        }
    }

    fn is_playing(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for ProcessPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// Headless player
// ============================================================================

/// Tracks playback state without producing any output (`--no-playback`).
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessBackend;

impl PlayerBackend for HeadlessBackend {
    fn create(&self, entry: &VideoEntry, muted: bool) -> Box<dyn MediaPlayer> {
        Box::new(HeadlessPlayer {
            id: entry.id.clone(),
            playing: false,
            muted,
        })
    }
}

struct HeadlessPlayer {
    id: String,
    playing: bool,
    muted: bool,
}

impl MediaPlayer for HeadlessPlayer {
    fn play(&mut self) -> Result<(), PlaybackError> {
        self.playing = true;
        tracing::trace!(id = %self.id, muted = self.muted, "Headless play");
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
