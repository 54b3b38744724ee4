//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse input handling
//! - `render` - Frame layout, card clipping, loading banner
//! - `reel_card` - A single reel card
//! - `status` - Status bar widget
//! - `help` - Keybinding help overlay

mod help;
mod input;
mod loop_runner;
mod reel_card;
mod render;
mod status;

pub use loop_runner::{run, Action};
