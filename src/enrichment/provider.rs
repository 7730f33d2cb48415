//! Metadata lookup seam and the fallback rules applied to its outcomes.

use serde::Serialize;
use thiserror::Error;

/// Shown when a track has no artwork or could not be looked up.
pub const DEFAULT_COVER_URL: &str = "https://i.postimg.cc/0QNxYz4V/social.png";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackMetadata {
    pub cover_url: Option<String>,
    pub listening_url: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Music service credentials are not configured")]
    MissingCredentials,
    #[error("Music service rejected the credentials: {0}")]
    Unauthorized(String),
    #[error("Music service request failed: {0}")]
    Transport(String),
    #[error("Music service answered with status {0}")]
    Status(u16),
    #[error("Could not decode music service response: {0}")]
    Decode(String),
}

/// Result of one external metadata call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(TrackMetadata),
    NotFound,
    Failed(LookupError),
}

/// Looks up artwork and a listening link for a song.
///
/// Implementations perform blocking I/O, async callers should run them on
/// the blocking pool.
pub trait MetadataProvider: Send + Sync {
    fn lookup(&self, title: &str, artist: &str) -> LookupOutcome;
}

/// Used when credentials are absent, every lookup fails without touching the
/// network.
pub struct UnconfiguredProvider;

impl MetadataProvider for UnconfiguredProvider {
    fn lookup(&self, _title: &str, _artist: &str) -> LookupOutcome {
        LookupOutcome::Failed(LookupError::MissingCredentials)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataStatus {
    Found,
    NotFound,
    Failed,
}

/// What gets displayed for a song once the lookup outcome is known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enrichment {
    pub cover_url: String,
    pub listening_url: Option<String>,
    pub status: MetadataStatus,
    pub notice: Option<String>,
}

pub fn resolve_enrichment(outcome: LookupOutcome, placeholder_url: &str) -> Enrichment {
    match outcome {
        LookupOutcome::Found(metadata) => Enrichment {
            cover_url: metadata
                .cover_url
                .unwrap_or_else(|| placeholder_url.to_string()),
            listening_url: metadata.listening_url,
            status: MetadataStatus::Found,
            notice: None,
        },
        LookupOutcome::NotFound => Enrichment {
            cover_url: placeholder_url.to_string(),
            listening_url: None,
            status: MetadataStatus::NotFound,
            notice: None,
        },
        LookupOutcome::Failed(err) => Enrichment {
            cover_url: placeholder_url.to_string(),
            listening_url: None,
            status: MetadataStatus::Failed,
            notice: Some(err.to_string()),
        },
    }
}
