//! Catalog files on disk: format detection, validation, and size limits.

use pretty_assertions::assert_eq;
use reelfeed::catalog::{self, CatalogError};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("reelfeed_catalog_{}", name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_json_catalog_keeps_order_and_skips_bad_records() {
    let dir = scratch_dir("json");
    let path = dir.join("videos.json");
    std::fs::write(
        &path,
        r##"[
            {"id": 1, "src": "https://cdn.example.com/1.mp4", "tags": ["#casino", "#win"]},
            {"id": "", "src": "https://cdn.example.com/x.mp4"},
            {"id": 2, "src": "ftp://cdn.example.com/2.mp4"},
            {"id": "3", "src": "file:///srv/reels/3.mp4"},
            {"id": 1, "src": "https://cdn.example.com/dup.mp4"}
        ]"##,
    )
    .unwrap();

    let entries = catalog::load(&path).unwrap();
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(entries[0].tags, vec!["#casino".to_string(), "#win".to_string()]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_toml_catalog() {
    let dir = scratch_dir("toml");
    let path = dir.join("videos.TOML");
    std::fs::write(
        &path,
        r##"
[[video]]
id = 10
src = "https://cdn.example.com/10.mp4"
tags = ["#slots"]

[[video]]
id = "11"
src = "https://cdn.example.com/11.mp4"
"##,
    )
    .unwrap();

    let entries = catalog::load(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].id, "11");
    assert!(entries[1].tags.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_oversized_catalog_rejected() {
    let dir = scratch_dir("large");
    let path = dir.join("videos.json");
    std::fs::write(&path, " ".repeat(8 * 1_048_576 + 1)).unwrap();

    assert!(matches!(
        catalog::load(&path),
        Err(CatalogError::TooLarge(_))
    ));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_malformed_json_is_fatal() {
    let dir = scratch_dir("malformed");
    let path = dir.join("videos.json");
    std::fs::write(&path, "[{\"id\": 1,").unwrap();

    assert!(matches!(catalog::load(&path), Err(CatalogError::Json(_))));

    std::fs::remove_dir_all(&dir).ok();
}
