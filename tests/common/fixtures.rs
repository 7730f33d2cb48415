//! Test dataset creation

use super::constants::*;
use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes the test catalog and similarity matrix into a fresh temp dir.
///
/// Returns the dir (keep it alive for as long as the files are needed) and
/// the catalog and similarity file paths.
pub fn create_test_dataset() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;

    let catalog: Vec<_> = ALL_SONGS
        .iter()
        .map(|(song, artist)| json!({ "song": song, "artist": artist, "genre": "rock" }))
        .collect();
    let catalog_path = dir.path().join("catalog.json");
    fs::write(&catalog_path, serde_json::to_string_pretty(&catalog)?)?;

    let similarity_path = dir.path().join("similarity.json");
    fs::write(&similarity_path, serde_json::to_string(&SIMILARITY)?)?;

    Ok((dir, catalog_path, similarity_path))
}
