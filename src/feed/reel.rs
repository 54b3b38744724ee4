//! One reel in the feed.
//!
//! A [`ReelItem`] mirrors the controller's active and mute state into its
//! media player and keeps the short-lived like and mute flashes.

use crate::catalog::VideoEntry;
use crate::platform::MediaPlayer;
use std::time::Duration;
use tokio::time::Instant;

/// A user action raised by a reel, handled by the feed controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReelAction {
    Like(String),
    ToggleMute,
    Share(String),
}

/// A short-lived visual cue with an explicit deadline.
///
/// There is no timer behind it: the owner polls [`Flash::expire`], so a
/// dropped reel can never receive a late "clear" callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flash {
    until: Option<Instant>,
}

impl Flash {
    pub fn trigger(&mut self, now: Instant, duration: Duration) {
        self.until = Some(now + duration);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Clear the flash if its deadline has passed. Returns true if it was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }
}

/// One reel in the feed: owns its player and its like/mute feedback flashes.
///
/// Everything else it shows (active, muted, liked) comes from the controller.
pub struct ReelItem {
    id: String,
    player: Box<dyn MediaPlayer>,
    active: bool,
    muted: bool,
    like_flash: Flash,
    mute_flash: Flash,
    feedback: Duration,
}

impl ReelItem {
    pub fn new(
        entry: &VideoEntry,
        player: Box<dyn MediaPlayer>,
        muted: bool,
        feedback: Duration,
    ) -> Self {
        Self {
            id: entry.id.clone(),
            player,
            active: false,
            muted,
            like_flash: Flash::default(),
            mute_flash: Flash::default(),
            feedback,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the controller currently considers this reel active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Reflect controller state into the player.
    ///
    /// Playback starts on the inactive → active edge and stops on the reverse.
    /// A failed start is logged and the reel stays paused until the next edge.
    pub fn sync(&mut self, is_active: bool, muted: bool) {
        if muted != self.muted {
            self.muted = muted;
            self.player.set_muted(muted);
        }

        if is_active == self.active {
            return;
        }
        self.active = is_active;

        if is_active {
            match self.player.play() {
                Ok(()) => tracing::debug!(id = %self.id, "Reel playing"),
                Err(e) => tracing::warn!(id = %self.id, error = %e, "Playback error"),
            }
        } else {
            self.player.pause();
            tracing::debug!(id = %self.id, "Reel paused");
        }
    }

    pub fn click_like(&mut self, now: Instant) -> ReelAction {
        self.like_flash.trigger(now, self.feedback);
        ReelAction::Like(self.id.clone())
    }

    pub fn click_mute(&mut self, now: Instant) -> ReelAction {
        self.mute_flash.trigger(now, self.feedback);
        ReelAction::ToggleMute
    }

    pub fn click_share(&self) -> ReelAction {
        ReelAction::Share(self.id.clone())
    }

    pub fn like_flash_active(&self, now: Instant) -> bool {
        self.like_flash.is_active(now)
    }

    pub fn mute_flash_active(&self, now: Instant) -> bool {
        self.mute_flash.is_active(now)
    }

    /// Clear elapsed flashes. Returns true if anything changed.
    pub fn expire_flashes(&mut self, now: Instant) -> bool {
        // Both must run; no short-circuit
        let like = self.like_flash.expire(now);
        let mute = self.mute_flash.expire(now);
        like | mute
    }
}

impl Drop for ReelItem {
    fn drop(&mut self) {
        if self.player.is_playing() {
            self.player.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlaybackError;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tokio::time;
    use url::Url;

    #[derive(Default)]
    struct Log {
        calls: Vec<&'static str>,
        playing: bool,
    }

    struct ScriptedPlayer {
        log: Rc<RefCell<Log>>,
        fail_play: bool,
    }

    impl MediaPlayer for ScriptedPlayer {
        fn play(&mut self) -> Result<(), PlaybackError> {
            let mut log = self.log.borrow_mut();
            log.calls.push("play");
            if self.fail_play {
                return Err(PlaybackError::NoCommand);
            }
            log.playing = true;
            Ok(())
        }
        fn pause(&mut self) {
            let mut log = self.log.borrow_mut();
            log.calls.push("pause");
            log.playing = false;
        }
        fn set_muted(&mut self, _muted: bool) {
            self.log.borrow_mut().calls.push("mute");
        }
        fn is_playing(&self) -> bool {
            self.log.borrow().playing
        }
    }

    fn reel(fail_play: bool) -> (ReelItem, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let entry = VideoEntry {
            id: "r1".into(),
            src: Url::parse("https://cdn.example.com/r1.mp4").unwrap(),
            tags: vec![],
        };
        let player = ScriptedPlayer {
            log: log.clone(),
            fail_play,
        };
        let item = ReelItem::new(&entry, Box::new(player), true, Duration::from_millis(1000));
        (item, log)
    }

    #[test]
    fn test_plays_on_activation_edge_only() {
        let (mut item, log) = reel(false);
        item.sync(true, true);
        item.sync(true, true);
        item.sync(false, true);
        item.sync(false, true);
        assert_eq!(log.borrow().calls, vec!["play", "pause"]);
    }

    #[test]
    fn test_playback_failure_is_not_fatal() {
        let (mut item, log) = reel(true);
        item.sync(true, true);
        assert!(item.is_active());
        assert!(!item.is_playing());
        // No retry while still active
        item.sync(true, true);
        assert_eq!(log.borrow().calls, vec!["play"]);
    }

    #[test]
    fn test_mute_forwarded_on_change() {
        let (mut item, log) = reel(false);
        item.sync(false, true);
        item.sync(false, false);
        item.sync(false, false);
        assert_eq!(log.borrow().calls, vec!["mute"]);
    }

    #[tokio::test]
    async fn test_like_flash_clears_after_feedback_window() {
        time::pause();
        let (mut item, _log) = reel(false);
        let action = item.click_like(Instant::now());
        assert_eq!(action, ReelAction::Like("r1".into()));
        assert!(item.like_flash_active(Instant::now()));

        time::advance(Duration::from_millis(999)).await;
        assert!(!item.expire_flashes(Instant::now()));
        assert!(item.like_flash_active(Instant::now()));

        time::advance(Duration::from_millis(1)).await;
        assert!(item.expire_flashes(Instant::now()));
        assert!(!item.like_flash_active(Instant::now()));
    }

    #[tokio::test]
    async fn test_mute_click_emits_toggle() {
        time::pause();
        let (mut item, _log) = reel(false);
        assert_eq!(item.click_mute(Instant::now()), ReelAction::ToggleMute);
        assert!(item.mute_flash_active(Instant::now()));
        assert!(!item.like_flash_active(Instant::now()));
    }

    #[test]
    fn test_drop_pauses_playing_reel() {
        let (mut item, log) = reel(false);
        item.sync(true, true);
        drop(item);
        assert_eq!(log.borrow().calls, vec!["play", "pause"]);
    }
}
