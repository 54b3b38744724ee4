use super::entry::{RawEntry, VideoEntry};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Maximum catalog file size (8 MB).
const MAX_FILE_SIZE: u64 = 8 * 1_048_576;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Catalog file too large: {0}")]
    TooLarge(String),

    #[error("Unknown catalog format '{0}' (expected .json or .toml)")]
    UnknownFormat(String),
}

/// JSON catalogs are either a bare array or an object with a `videos` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    Bare(Vec<RawEntry>),
    Wrapped { videos: Vec<RawEntry> },
}

/// TOML catalogs use an array of `[[video]]` tables.
#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    video: Vec<RawEntry>,
}

/// Load a catalog, choosing the format from the file extension.
///
/// Invalid records are skipped with a warning; see [`parse_json`].
pub fn load(path: &Path) -> Result<Vec<VideoEntry>, CatalogError> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_FILE_SIZE {
        return Err(CatalogError::TooLarge(format!(
            "{} is {} bytes (max {} bytes)",
            path.display(),
            meta.len(),
            MAX_FILE_SIZE
        )));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = std::fs::read_to_string(path)?;
    let entries = match ext.as_str() {
        "json" => parse_json(&content)?,
        "toml" => parse_toml(&content)?,
        other => return Err(CatalogError::UnknownFormat(other.to_string())),
    };

    tracing::info!(path = %path.display(), entries = entries.len(), "Loaded catalog");
    Ok(entries)
}

/// Parse a JSON catalog.
///
/// Records with an empty id, an unusable `src`, or an id seen earlier in the
/// file are dropped; the rest keep their order.
pub fn parse_json(content: &str) -> Result<Vec<VideoEntry>, CatalogError> {
    let raw = match serde_json::from_str::<JsonCatalog>(content)? {
        JsonCatalog::Bare(v) => v,
        JsonCatalog::Wrapped { videos } => videos,
    };
    Ok(validate(raw))
}

/// Parse a TOML catalog (`[[video]]` tables).
pub fn parse_toml(content: &str) -> Result<Vec<VideoEntry>, CatalogError> {
    let catalog: TomlCatalog = toml::from_str(content)?;
    Ok(validate(catalog.video))
}

fn validate(raw: Vec<RawEntry>) -> Vec<VideoEntry> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut entries = Vec::with_capacity(raw.len());

    for (position, record) in raw.into_iter().enumerate() {
        match record.into_entry() {
            Ok(entry) => {
                if !seen.insert(entry.id.clone()) {
                    tracing::warn!(position, id = %entry.id, "Duplicate catalog id, skipping");
                    continue;
                }
                entries.push(entry);
            }
            Err(e) => {
                tracing::warn!(position, error = %e, "Skipping invalid catalog entry");
            }
        }
    }

    entries
}
