//! Song recommender library
//!
//! This library exposes the internal modules for testing and for the binaries.

pub mod catalog;
pub mod config;
pub mod enrichment;
pub mod recommend;
pub mod server;

// Re-export commonly used types for convenience
pub use catalog::{load_dataset, Catalog, Dataset, SimilarityMatrix, Song};
pub use enrichment::{MetadataProvider, SpotifyClient, SpotifyCredentials, UnconfiguredProvider};
pub use recommend::{build_cards, RecommendationCard, Recommender};
pub use server::{run_server, RequestsLoggingLevel};
