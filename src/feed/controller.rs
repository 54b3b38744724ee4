//! Authoritative feed state: active reel, loaded count, mute, likes.
//!
//! Scroll metrics come in through [`FeedController::on_scroll`] and
//! [`FeedController::tick`]. Batches load in a spawned task that reports back
//! over the feed event channel.

use super::throttle::Throttle;
use super::viewport::ViewportMetrics;
use crate::catalog::VideoEntry;
use crate::platform::{ShareOutcome, SharePayload, Sharer};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use url::Url;

/// Reels added per lazy-load batch.
pub const DEFAULT_BATCH_SIZE: usize = 3;

// ============================================================================
// Settings and State
// ============================================================================

/// Tunables for the feed, normally built from `Config`.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Reels loaded before any scrolling.
    pub initial_batch: usize,
    pub batch_size: usize,
    /// Simulated fetch latency for a batch.
    pub load_delay: Duration,
    /// Rows from the content end at which the next batch is requested.
    pub load_threshold: u32,
    pub scroll_throttle: Duration,
    pub start_muted: bool,
    /// Share links are this URL plus the reel id as a final path segment.
    pub share_base: Url,
    pub share_title: String,
    pub share_text: String,
}

impl FeedSettings {
    /// Default tunables sharing links under `share_base`.
    pub fn new(share_base: Url) -> Self {
        Self {
            initial_batch: DEFAULT_BATCH_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            load_delay: Duration::from_millis(1000),
            load_threshold: 1,
            scroll_throttle: Duration::from_millis(200),
            start_muted: true,
            share_base,
            share_title: "Check out this Casino reel!".to_string(),
            share_text: "Check out this Casino video reel on CASINOW3W!".to_string(),
        }
    }
}

/// Authoritative feed state. Only the controller mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    /// Reel under the viewport midpoint (the one allowed to play).
    pub visible_index: usize,
    /// Reels currently rendered. Never decreases, never exceeds the catalog.
    pub loaded_count: usize,
    /// Global mute, applied to every reel.
    pub muted: bool,
    pub liked_ids: HashSet<String>,
    /// A lazy-load batch is in flight.
    pub loading: bool,
}

/// Messages from controller background tasks back to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    /// The simulated fetch for load `generation` finished.
    BatchReady { generation: u64 },
}

/// What a scroll notification did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollUpdate {
    /// The throttle let the recomputation run.
    pub recomputed: bool,
    pub index_changed: bool,
    pub load_started: bool,
}

/// Clamp the midpoint index to the loaded range.
///
/// `None` when nothing is loaded or the viewport has no height.
pub fn active_index_for(metrics: &ViewportMetrics, loaded_count: usize) -> Option<usize> {
    if loaded_count == 0 {
        return None;
    }
    metrics
        .midpoint_index()
        .map(|idx| idx.min(loaded_count - 1))
}

// ============================================================================
// Feed Controller
// ============================================================================

/// Owns feed state: which reel is active, how many are loaded, mute and likes.
///
/// Scroll notifications are throttled; the trailing edge is delivered through
/// [`FeedController::tick`]. Lazy loads run as a background task that reports
/// back with [`FeedEvent::BatchReady`]; only one is ever in flight.
pub struct FeedController {
    entries: Arc<Vec<VideoEntry>>,
    state: FeedState,
    settings: FeedSettings,
    throttle: Throttle,
    last_metrics: Option<ViewportMetrics>,
    /// Incremented per load and on teardown; stale `BatchReady`s are ignored.
    load_generation: u64,
    load_handle: Option<JoinHandle<()>>,
    event_tx: mpsc::Sender<FeedEvent>,
}

impl FeedController {
    pub fn new(
        entries: Arc<Vec<VideoEntry>>,
        settings: FeedSettings,
        event_tx: mpsc::Sender<FeedEvent>,
    ) -> Self {
        let state = FeedState {
            visible_index: 0,
            // At least one reel, or the viewport has nothing to scroll and
            // the load trigger is unreachable
            loaded_count: settings.initial_batch.max(1).min(entries.len()),
            muted: settings.start_muted,
            liked_ids: HashSet::new(),
            loading: false,
        };
        Self {
            throttle: Throttle::new(settings.scroll_throttle),
            entries,
            state,
            settings,
            last_metrics: None,
            load_generation: 0,
            load_handle: None,
            event_tx,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Entries currently rendered, in feed order.
    pub fn loaded_entries(&self) -> &[VideoEntry] {
        &self.entries[..self.state.loaded_count]
    }

    /// The single reel allowed to play, if any.
    pub fn active_index(&self) -> Option<usize> {
        if self.state.loaded_count == 0 {
            None
        } else {
            Some(self.state.visible_index.min(self.state.loaded_count - 1))
        }
    }

    pub fn active_entry(&self) -> Option<&VideoEntry> {
        self.active_index().and_then(|idx| self.entries.get(idx))
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.state.liked_ids.contains(id)
    }

    // ------------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------------

    /// Handle a scroll notification.
    ///
    /// Runs at most once per throttle window; calls inside the window are
    /// remembered and replayed by [`FeedController::tick`].
    pub fn on_scroll(&mut self, metrics: ViewportMetrics) -> ScrollUpdate {
        self.last_metrics = Some(metrics);
        if !self.throttle.try_fire(Instant::now()) {
            return ScrollUpdate::default();
        }
        self.recompute(metrics)
    }

    /// Deliver the throttle's trailing edge. Call periodically.
    pub fn tick(&mut self) -> ScrollUpdate {
        if !self.throttle.take_trailing(Instant::now()) {
            return ScrollUpdate::default();
        }
        match self.last_metrics {
            Some(metrics) => self.recompute(metrics),
            None => ScrollUpdate::default(),
        }
    }

    fn recompute(&mut self, metrics: ViewportMetrics) -> ScrollUpdate {
        let mut update = ScrollUpdate {
            recomputed: true,
            ..Default::default()
        };
        if self.entries.is_empty() {
            return update;
        }

        if let Some(next) = active_index_for(&metrics, self.state.loaded_count) {
            if next != self.state.visible_index {
                tracing::debug!(from = self.state.visible_index, to = next, "Active reel changed");
                self.state.visible_index = next;
                update.index_changed = true;
            }
        }

        if metrics.near_end(self.settings.load_threshold) {
            update.load_started = self.request_load();
        }

        update
    }

    // ------------------------------------------------------------------------
    // Lazy loading
    // ------------------------------------------------------------------------

    /// Start a lazy-load batch unless one is in flight or everything is loaded.
    ///
    /// Returns true if a batch was started.
    pub fn request_load(&mut self) -> bool {
        if self.state.loading || self.state.loaded_count >= self.entries.len() {
            return false;
        }

        self.state.loading = true;
        self.load_generation = self.load_generation.wrapping_add(1);
        let generation = self.load_generation;
        let delay = self.settings.load_delay;
        let tx = self.event_tx.clone();

        tracing::info!(
            generation,
            loaded = self.state.loaded_count,
            total = self.entries.len(),
            "Loading more reels"
        );

        self.load_handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = tx.send(FeedEvent::BatchReady { generation }).await {
                tracing::debug!(error = %e, "Batch ready after event loop closed");
            }
        }));
        true
    }

    /// Apply a finished batch. Returns how many reels were added.
    pub fn complete_load(&mut self, generation: u64) -> usize {
        if !self.state.loading || generation != self.load_generation {
            tracing::debug!(
                generation,
                current = self.load_generation,
                "Ignoring stale batch"
            );
            return 0;
        }

        let before = self.state.loaded_count;
        self.state.loaded_count = (before + self.settings.batch_size).min(self.entries.len());
        self.state.loading = false;
        self.load_handle = None;

        let added = self.state.loaded_count - before;
        tracing::info!(added, loaded = self.state.loaded_count, "Batch loaded");
        added
    }

    // ------------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------------

    /// Flip the global mute flag. Returns the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.state.muted = !self.state.muted;
        self.state.muted
    }

    /// Flip the like on `id`. Returns the new liked state, or `None` for an
    /// id that is not in the catalog.
    pub fn like(&mut self, id: &str) -> Option<bool> {
        if !self.entries.iter().any(|e| e.id == id) {
            tracing::debug!(id, "Ignoring like for unknown reel");
            return None;
        }
        if self.state.liked_ids.remove(id) {
            Some(false)
        } else {
            self.state.liked_ids.insert(id.to_string());
            Some(true)
        }
    }

    /// The share link for a reel: the base URL with the id appended as a
    /// percent-encoded path segment.
    pub fn share_url(&self, id: &str) -> Option<Url> {
        if !self.entries.iter().any(|e| e.id == id) {
            return None;
        }
        let mut url = self.settings.share_base.clone();
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().push(id);
            }
            Err(()) => return None,
        }
        Some(url)
    }

    /// Share a reel through `sharer`. `None` for an unknown id.
    pub fn share(&self, id: &str, sharer: &mut Sharer) -> Option<ShareOutcome> {
        let url = self.share_url(id)?;
        let payload = SharePayload {
            title: self.settings.share_title.clone(),
            text: self.settings.share_text.clone(),
            url,
        };
        Some(sharer.share(&payload))
    }

    // ------------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------------

    /// Cancel pending work. A batch already queued on the channel will be
    /// rejected as stale by [`FeedController::complete_load`].
    pub fn teardown(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted pending batch load");
        }
        self.state.loading = false;
        self.load_generation = self.load_generation.wrapping_add(1);
        self.throttle.reset();
        self.last_metrics = None;
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
        }
    }
}
