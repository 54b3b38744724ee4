use crate::util::{strip_control_chars, validate_media_url, UrlValidationError};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// A single reel in the catalog.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    /// Stable identifier, unique within the catalog.
    pub id: String,
    /// Where the player fetches the video from.
    pub src: Url,
    /// Display tags in catalog order.
    pub tags: Vec<String>,
}

/// Why a catalog record was rejected.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("entry has an empty id")]
    EmptyId,

    #[error("entry '{id}' has an invalid src: {source}")]
    BadSource {
        id: String,
        #[source]
        source: UrlValidationError,
    },
}

/// Ids are written as strings or bare integers depending on who produced the
/// catalog; both normalise to a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(i64),
}

/// A catalog record as it appears on disk, before validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    pub id: RawId,
    pub src: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RawEntry {
    pub(crate) fn into_entry(self) -> Result<VideoEntry, EntryError> {
        let id = match self.id {
            RawId::Text(s) => strip_control_chars(s.trim()).into_owned(),
            RawId::Number(n) => n.to_string(),
        };
        if id.is_empty() {
            return Err(EntryError::EmptyId);
        }

        let src = validate_media_url(&self.src).map_err(|source| EntryError::BadSource {
            id: id.clone(),
            source,
        })?;

        let tags = self
            .tags
            .iter()
            .map(|t| strip_control_chars(t.trim()).into_owned())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(VideoEntry { id, src, tags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: RawId, src: &str, tags: &[&str]) -> RawEntry {
        RawEntry {
            id,
            src: src.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_numeric_id_normalised() {
        let entry = raw(RawId::Number(7), "https://cdn.example.com/7.mp4", &[])
            .into_entry()
            .unwrap();
        assert_eq!(entry.id, "7");
    }

    #[test]
    fn test_blank_id_rejected() {
        let err = raw(RawId::Text("   ".into()), "https://cdn.example.com/a.mp4", &[])
            .into_entry()
            .unwrap_err();
        assert!(matches!(err, EntryError::EmptyId));
    }

    #[test]
    fn test_bad_src_names_entry() {
        let err = raw(RawId::Text("r1".into()), "gopher://old.example.com/a", &[])
            .into_entry()
            .unwrap_err();
        assert!(err.to_string().contains("'r1'"));
    }

    #[test]
    fn test_tags_cleaned() {
        let entry = raw(
            RawId::Text("r1".into()),
            "https://cdn.example.com/a.mp4",
            &[" #casino ", "", "#slots\x1b"],
        )
        .into_entry()
        .unwrap();
        assert_eq!(entry.tags, vec!["#casino".to_string(), "#slots".to_string()]);
    }
}
