use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A catalog entry. The JSON field is called `song` in the exported data.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Song {
    #[serde(rename = "song")]
    pub title: String,
    pub artist: String,
}

impl Song {
    pub fn new<T: Into<String>, A: Into<String>>(title: T, artist: A) -> Song {
        Song {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

/// Ordered list of songs, the position of each song is its row/column in
/// the similarity matrix.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    pub fn from_songs(songs: Vec<Song>) -> Catalog {
        Catalog { songs }
    }

    pub fn from_json_str(json: &str) -> Result<Catalog> {
        let songs: Vec<Song> = serde_json::from_str(json)?;
        Ok(Catalog { songs })
    }

    pub fn from_json_file(path: &Path) -> Result<Catalog> {
        let file_text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
        Catalog::from_json_str(&file_text)
            .with_context(|| format!("Failed to parse catalog file: {:?}", path))
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    /// Index of the first song with exactly this title. Later songs sharing
    /// the title are never returned.
    pub fn find_first(&self, title: &str) -> Option<usize> {
        self.songs.iter().position(|s| s.title == title)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.songs.iter().map(|s| s.title.as_str())
    }
}
