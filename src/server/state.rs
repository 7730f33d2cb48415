use axum::extract::FromRef;

use crate::enrichment::MetadataProvider;
use crate::recommend::Recommender;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedRecommender = Arc<Recommender>;
pub type GuardedMetadataProvider = Arc<dyn MetadataProvider>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub recommender: GuardedRecommender,
    pub metadata_provider: GuardedMetadataProvider,
    /// Shown on every page, e.g. when music service credentials are missing.
    pub startup_notice: Option<String>,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedRecommender {
    fn from_ref(input: &ServerState) -> Self {
        input.recommender.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
