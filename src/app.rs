use crate::catalog::VideoEntry;
use crate::config::Config;
use crate::feed::{
    FeedController, FeedEvent, ReelAction, ReelItem, ScrollUpdate, ScrollViewport,
    ViewportMetrics, ViewportProvider,
};
use crate::keybindings::KeybindingRegistry;
use crate::platform::{PlayerBackend, Sharer};
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a status bar message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Number of frames in the loading spinner animation.
pub const SPINNER_FRAMES: usize = 10;

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
///
/// Owns the feed controller and one [`ReelItem`] per loaded entry. Data flows
/// down (controller state into reels via [`App::sync_reels`]) and actions flow
/// up (reel clicks become [`ReelAction`]s handled by [`App::dispatch`]).
pub struct App {
    pub feed: FeedController,
    /// One per loaded entry, in feed order.
    pub reels: Vec<ReelItem>,
    pub viewport: ScrollViewport,
    backend: Box<dyn PlayerBackend>,
    sharer: Sharer,
    feedback: Duration,

    pub keybindings: KeybindingRegistry,
    /// Card label prefix, rendered as `{label_prefix} id: {id}`.
    pub label_prefix: String,

    /// Status message with expiry. Cow avoids allocation for static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// Current frame of the loading spinner (0-9), advanced by the tick.
    pub spinner_frame: usize,
}

impl App {
    pub fn new(
        entries: Arc<Vec<VideoEntry>>,
        config: &Config,
        backend: Box<dyn PlayerBackend>,
        sharer: Sharer,
        event_tx: mpsc::Sender<FeedEvent>,
    ) -> Result<Self> {
        let settings = config
            .feed_settings()
            .context("Invalid feed settings in config")?;
        let feed = FeedController::new(entries, settings, event_tx);
        let viewport = ScrollViewport::new(0, feed.state().loaded_count);

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!("{}", warning);
        }

        Ok(Self {
            feed,
            reels: Vec::new(),
            viewport,
            backend,
            sharer,
            feedback: config.feedback(),
            keybindings,
            label_prefix: config.label_prefix.clone(),
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
            spinner_frame: 0,
        })
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Attach the feed to the viewport and start the first reel.
    ///
    /// Returns the scroll notification stream the event loop must forward to
    /// [`App::on_viewport`].
    pub fn mount(&mut self) -> Result<mpsc::UnboundedReceiver<ViewportMetrics>> {
        let rx = self
            .viewport
            .subscribe()
            .context("Failed to subscribe to viewport")?;
        self.sync_reels();
        tracing::info!(
            loaded = self.feed.state().loaded_count,
            total = self.feed.total(),
            "Feed mounted"
        );
        Ok(rx)
    }

    /// Detach from the viewport, cancel pending loads and stop all playback.
    pub fn unmount(&mut self) {
        self.viewport.unsubscribe();
        self.feed.teardown();
        self.reels.clear();
        tracing::info!("Feed unmounted");
    }

    /// Set the reel area height in rows.
    pub fn resize(&mut self, rows: u16) {
        self.viewport.resize(u32::from(rows));
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------------
    // Event handlers
    // ------------------------------------------------------------------------

    /// Forward a scroll notification to the controller.
    pub fn on_viewport(&mut self, metrics: ViewportMetrics) {
        self.needs_redraw = true;
        let update = self.feed.on_scroll(metrics);
        self.apply(update);
    }

    /// Periodic housekeeping: throttle trailing edge, flash and status expiry,
    /// spinner animation.
    pub fn on_tick(&mut self) {
        let update = self.feed.tick();
        self.apply(update);

        let now = Instant::now();
        for reel in &mut self.reels {
            if reel.expire_flashes(now) {
                self.needs_redraw = true;
            }
        }

        if self.feed.state().loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES;
            self.needs_redraw = true;
        }

        if self.clear_expired_status() {
            self.needs_redraw = true;
        }
    }

    pub fn handle_feed_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::BatchReady { generation } => {
                if self.feed.complete_load(generation) > 0 {
                    self.viewport.set_item_count(self.feed.state().loaded_count);
                    self.sync_reels();
                }
                self.needs_redraw = true;
            }
        }
    }

    fn apply(&mut self, update: ScrollUpdate) {
        if update.index_changed {
            self.sync_reels();
        }
        if update.recomputed {
            self.needs_redraw = true;
        }
    }

    /// Push controller state down into the reels, creating reels for newly
    /// loaded entries.
    pub fn sync_reels(&mut self) {
        let muted = self.feed.state().muted;
        let loaded = self.feed.loaded_entries();
        for entry in &loaded[self.reels.len().min(loaded.len())..] {
            let player = self.backend.create(entry, muted);
            self.reels
                .push(ReelItem::new(entry, player, muted, self.feedback));
        }

        let active = self.feed.active_index();
        for (idx, reel) in self.reels.iter_mut().enumerate() {
            reel.sync(active == Some(idx), muted);
        }
    }

    // ------------------------------------------------------------------------
    // Reel actions
    // ------------------------------------------------------------------------

    fn active_reel_mut(&mut self) -> Option<&mut ReelItem> {
        let idx = self.feed.active_index()?;
        self.reels.get_mut(idx)
    }

    pub fn like_active(&mut self) {
        let now = Instant::now();
        if let Some(action) = self.active_reel_mut().map(|r| r.click_like(now)) {
            self.dispatch(action);
        }
    }

    pub fn mute_active(&mut self) {
        let now = Instant::now();
        if let Some(action) = self.active_reel_mut().map(|r| r.click_mute(now)) {
            self.dispatch(action);
        }
    }

    pub fn share_active(&mut self) {
        if let Some(action) = self.active_reel_mut().map(|r| r.click_share()) {
            self.dispatch(action);
        }
    }

    /// Hand the active reel's source to the system handler.
    pub fn open_active(&mut self) {
        let Some(entry) = self.feed.active_entry() else {
            return;
        };
        let url = entry.src.to_string();
        match open::that(&url) {
            Ok(()) => tracing::info!(url = %url, "Opened reel source"),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to open reel source");
                self.set_status(format!("Failed to open: {}", e));
            }
        }
    }

    /// Route a reel action to the controller.
    pub fn dispatch(&mut self, action: ReelAction) {
        self.needs_redraw = true;
        match action {
            ReelAction::Like(id) => {
                if let Some(liked) = self.feed.like(&id) {
                    tracing::debug!(id = %id, liked, "Like toggled");
                }
            }
            ReelAction::ToggleMute => {
                let muted = self.feed.toggle_mute();
                tracing::debug!(muted, "Mute toggled");
                self.sync_reels();
            }
            ReelAction::Share(id) => {
                let outcome = self.feed.share(&id, &mut self.sharer);
                if let Some(notice) = outcome.and_then(|o| o.notice()) {
                    self.set_status(notice);
                }
            }
        }
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.feed.is_liked(id)
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.viewport.unsubscribe();
        self.feed.teardown();
        tracing::debug!("Feed torn down on App drop");
    }
}
