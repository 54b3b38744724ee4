//! Video catalog: the static, ordered list of reels the feed shows.
//!
//! Catalogs are JSON (`[{"id": .., "src": .., "tags": [..]}]`) or TOML
//! (`[[video]]` tables). They are read once at startup and never written.
//!
//! # Example
//!
//! ```
//! use reelfeed::catalog::parse_json;
//!
//! let entries = parse_json(r#"[{"id": 1, "src": "https://cdn.example.com/1.mp4"}]"#).unwrap();
//! assert_eq!(entries[0].id, "1");
//! ```

mod entry;
mod loader;

pub use entry::{EntryError, VideoEntry};
pub use loader::{load, parse_json, parse_toml, CatalogError};
