//! reelfeed: a terminal short-form video feed.
//!
//! Reels are stacked full-height in a scrollable viewport. The reel under the
//! viewport midpoint is the only one playing; more reels are loaded in
//! batches as the end of the list comes into view.

pub mod app;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod platform;
pub mod ui;
pub mod util;
