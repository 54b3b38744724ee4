//! The reel feed: scroll-driven selection of the one playing reel, lazy
//! loading, and per-reel playback.
//!
//! - [`viewport`] - scroll metrics and the provider the controller subscribes to
//! - [`throttle`] - leading/trailing rate limiter for scroll handling
//! - [`controller`] - authoritative feed state and user actions
//! - [`reel`] - one reel's playback and feedback flashes
//!
//! # Example
//!
//! ```
//! use reelfeed::feed::ViewportMetrics;
//!
//! let m = ViewportMetrics { scroll_top: 1000, viewport_height: 800, scroll_height: 8000 };
//! assert_eq!(m.midpoint_index(), Some(1));
//! ```

pub mod controller;
pub mod reel;
pub mod throttle;
pub mod viewport;

pub use controller::{
    active_index_for, FeedController, FeedEvent, FeedSettings, FeedState, ScrollUpdate,
    DEFAULT_BATCH_SIZE,
};
pub use reel::{Flash, ReelAction, ReelItem};
pub use throttle::Throttle;
pub use viewport::{ScrollViewport, ViewportError, ViewportMetrics, ViewportProvider};
