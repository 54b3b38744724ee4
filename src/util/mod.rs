//! Utility functions shared across the crate.
//!
//! - **URL validation**: scheme checks for catalog sources and share links
//! - **Text processing**: width-aware truncation and control-char stripping
//!
//! # Examples
//!
//! ```
//! use reelfeed::util::{truncate_to_width, validate_media_url};
//!
//! let src = validate_media_url("https://cdn.example.com/reel.mp4").unwrap();
//! assert_eq!(src.host_str(), Some("cdn.example.com"));
//! assert_eq!(truncate_to_width("#longboarding", 8), "#long...");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_media_url, validate_share_base, UrlValidationError};
