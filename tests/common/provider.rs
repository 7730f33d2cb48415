//! Deterministic metadata provider for server tests

use super::constants::*;
use song_recommender::enrichment::{LookupOutcome, MetadataProvider, TrackMetadata};
use std::sync::Mutex;

/// Knows every song except `UNKNOWN_TO_SERVICE`, records the lookups it gets.
#[derive(Default)]
pub struct FakeProvider {
    pub lookups: Mutex<Vec<String>>,
}

impl MetadataProvider for FakeProvider {
    fn lookup(&self, title: &str, _artist: &str) -> LookupOutcome {
        self.lookups.lock().unwrap().push(title.to_string());
        if title == UNKNOWN_TO_SERVICE {
            return LookupOutcome::NotFound;
        }
        let slug = title.replace(' ', "-");
        LookupOutcome::Found(TrackMetadata {
            cover_url: Some(format!("{}/{}.jpg", COVERS_BASE_URL, slug)),
            listening_url: Some(format!("{}/{}", LISTEN_BASE_URL, slug)),
        })
    }
}
