//! Cover art and listening links for recommended songs.

mod credentials;
mod models;
mod provider;
mod spotify;

pub use credentials::{
    MissingCredentials, SpotifyCredentials, CLIENT_ID_ENV_VAR, CLIENT_SECRET_ENV_VAR,
};
pub use provider::{
    resolve_enrichment, Enrichment, LookupError, LookupOutcome, MetadataProvider,
    MetadataStatus, TrackMetadata, UnconfiguredProvider, DEFAULT_COVER_URL,
};
pub use spotify::{SpotifyClient, SpotifySettings};
