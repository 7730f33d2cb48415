//! Subset of the Spotify Web API payloads the client reads.

use super::TrackMetadata;
use serde::Deserialize;
use std::cmp::Reverse;

#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Deserialize, Debug)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<SpotifyTrack>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyTrack {
    pub name: Option<String>,
    pub album: Option<SpotifyAlbum>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl SpotifyImage {
    fn area(&self) -> u64 {
        self.width.unwrap_or(0) as u64 * self.height.unwrap_or(0) as u64
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

impl SearchResponse {
    /// Only the top hit is ever used.
    pub fn into_first_track(self) -> Option<SpotifyTrack> {
        self.tracks.and_then(|page| page.items.into_iter().next())
    }
}

impl SpotifyTrack {
    /// Picks the largest album image; the first one wins among equals, which
    /// is also the largest in Spotify's own ordering when sizes are missing.
    pub fn largest_image_url(&self) -> Option<&str> {
        self.album
            .as_ref()?
            .images
            .iter()
            .min_by_key(|image| Reverse(image.area()))
            .map(|image| image.url.as_str())
    }

    pub fn into_metadata(self) -> TrackMetadata {
        TrackMetadata {
            cover_url: self.largest_image_url().map(str::to_string),
            listening_url: self.external_urls.spotify,
        }
    }
}
