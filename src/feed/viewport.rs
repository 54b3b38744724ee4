//! Viewport metrics and the scroll model that produces them.
//!
//! The controller never reads scroll state directly. It receives
//! [`ViewportMetrics`] snapshots from whatever [`ViewportProvider`] it was
//! mounted on, which keeps the feed logic testable without a terminal.

use thiserror::Error;
use tokio::sync::mpsc;

/// Snapshot of the scroll position, in terminal rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportMetrics {
    /// Offset of the viewport's top edge into the content.
    pub scroll_top: u32,
    /// Visible height; every reel is exactly this tall.
    pub viewport_height: u32,
    /// Total content height.
    pub scroll_height: u32,
}

impl ViewportMetrics {
    /// Index of the reel under the viewport's vertical midpoint.
    ///
    /// `floor((scroll_top + h/2) / h)`, computed as `(2*top + h) / (2*h)` so
    /// odd heights round the same way a fractional midpoint would. Returns
    /// `None` for a zero-height viewport. Not clamped to the item count.
    pub fn midpoint_index(&self) -> Option<usize> {
        if self.viewport_height == 0 {
            return None;
        }
        let top = u64::from(self.scroll_top);
        let h = u64::from(self.viewport_height);
        Some(((2 * top + h) / (2 * h)) as usize)
    }

    /// Whether the bottom edge is within `threshold` rows of the content end.
    pub fn near_end(&self, threshold: u32) -> bool {
        let bottom = u64::from(self.scroll_top) + u64::from(self.viewport_height);
        bottom >= u64::from(self.scroll_height.saturating_sub(threshold))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewportError {
    #[error("viewport already has an active scroll subscriber")]
    AlreadySubscribed,
}

/// Source of scroll metrics with a single-subscriber notification channel.
pub trait ViewportProvider {
    /// Current metrics.
    fn metrics(&self) -> ViewportMetrics;

    /// Register for scroll notifications.
    ///
    /// Only one live subscriber is allowed; a second call fails until the
    /// first unsubscribes or drops its receiver.
    fn subscribe(&mut self) -> Result<mpsc::UnboundedReceiver<ViewportMetrics>, ViewportError>;

    /// Drop the current subscription, if any.
    fn unsubscribe(&mut self);
}

/// Terminal scroll model: a vertical stack of equally tall reels.
#[derive(Debug)]
pub struct ScrollViewport {
    height: u32,
    scroll_top: u32,
    item_count: usize,
    subscriber: Option<mpsc::UnboundedSender<ViewportMetrics>>,
}

impl ScrollViewport {
    pub fn new(height: u32, item_count: usize) -> Self {
        Self {
            height,
            scroll_top: 0,
            item_count,
            subscriber: None,
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    fn content_height(&self) -> u32 {
        let total = self.item_count as u64 * u64::from(self.height);
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    fn max_top(&self) -> u32 {
        self.content_height().saturating_sub(self.height)
    }

    /// Update the number of stacked reels. Does not notify unless the
    /// scroll position had to be clamped.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        let clamped = self.scroll_top.min(self.max_top());
        if clamped != self.scroll_top {
            self.scroll_top = clamped;
            self.publish();
        }
    }

    /// Change the viewport height, keeping the same relative position.
    pub fn resize(&mut self, height: u32) {
        if height == self.height {
            return;
        }
        let old = self.height;
        self.height = height;
        self.scroll_top = if old == 0 {
            0
        } else {
            let scaled = u64::from(self.scroll_top) * u64::from(height) / u64::from(old);
            u32::try_from(scaled).unwrap_or(u32::MAX)
        }
        .min(self.max_top());
        self.publish();
    }

    /// Scroll by `delta` rows (negative is up). Notifies only on movement.
    pub fn scroll_by(&mut self, delta: i64) {
        let target = (i64::from(self.scroll_top) + delta).clamp(0, i64::from(self.max_top()));
        self.scroll_to(target as u32);
    }

    /// Scroll to an absolute row, clamped to the content.
    pub fn scroll_to(&mut self, top: u32) {
        let top = top.min(self.max_top());
        if top != self.scroll_top {
            self.scroll_top = top;
            self.publish();
        }
    }

    /// Snap to the start of the reel after the one under the midpoint.
    pub fn next_item(&mut self) {
        let idx = self.metrics().midpoint_index().unwrap_or(0) as u64;
        let target = (idx + 1) * u64::from(self.height);
        self.scroll_to(u32::try_from(target).unwrap_or(u32::MAX));
    }

    /// Snap to the start of the reel before the one under the midpoint.
    pub fn prev_item(&mut self) {
        let idx = self.metrics().midpoint_index().unwrap_or(0) as u64;
        let target = idx.saturating_sub(1) * u64::from(self.height);
        self.scroll_to(u32::try_from(target).unwrap_or(u32::MAX));
    }

    pub fn to_top(&mut self) {
        self.scroll_to(0);
    }

    pub fn to_bottom(&mut self) {
        self.scroll_to(self.max_top());
    }

    fn publish(&mut self) {
        let metrics = self.metrics();
        if let Some(tx) = &self.subscriber {
            if tx.send(metrics).is_err() {
                tracing::debug!("Scroll subscriber went away, dropping subscription");
                self.subscriber = None;
            }
        }
    }
}

impl ViewportProvider for ScrollViewport {
    fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_top: self.scroll_top,
            viewport_height: self.height,
            scroll_height: self.content_height(),
        }
    }

    fn subscribe(&mut self) -> Result<mpsc::UnboundedReceiver<ViewportMetrics>, ViewportError> {
        if let Some(tx) = &self.subscriber {
            if !tx.is_closed() {
                return Err(ViewportError::AlreadySubscribed);
            }
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriber = Some(tx);
        tracing::debug!("Scroll subscriber attached");
        Ok(rx)
    }

    fn unsubscribe(&mut self) {
        if self.subscriber.take().is_some() {
            tracing::debug!("Scroll subscriber detached");
        }
    }
}
