use super::RequestsLoggingLevel;
use crate::enrichment::DEFAULT_COVER_URL;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Cover shown when a track has no artwork or the lookup failed.
    pub placeholder_image_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3002,
            placeholder_image_url: DEFAULT_COVER_URL.to_string(),
        }
    }
}
