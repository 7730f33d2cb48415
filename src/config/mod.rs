mod file_config;

pub use file_config::{FileConfig, SpotifyConfig};

use crate::enrichment::{SpotifySettings, DEFAULT_COVER_URL};
use crate::recommend::DEFAULT_RECOMMENDATIONS_COUNT;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const CATALOG_FILE_NAME: &str = "catalog.json";
pub const SIMILARITY_FILE_NAME: &str = "similarity.json";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub similarity_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub recommendations_count: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            data_dir: None,
            catalog_path: None,
            similarity_path: None,
            port: 3002,
            logging_level: RequestsLoggingLevel::default(),
            recommendations_count: DEFAULT_RECOMMENDATIONS_COUNT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub similarity_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub recommendations_count: usize,
    pub placeholder_image_url: String,
    pub spotify: SpotifySettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("data_dir must be specified via --data-dir or in config file")
            })?;

        if !data_dir.exists() {
            bail!("Data directory does not exist: {:?}", data_dir);
        }
        if !data_dir.is_dir() {
            bail!("data_dir is not a directory: {:?}", data_dir);
        }

        let catalog_path = file
            .catalog_path
            .map(PathBuf::from)
            .or_else(|| cli.catalog_path.clone())
            .unwrap_or_else(|| data_dir.join(CATALOG_FILE_NAME));
        let similarity_path = file
            .similarity_path
            .map(PathBuf::from)
            .or_else(|| cli.similarity_path.clone())
            .unwrap_or_else(|| data_dir.join(SIMILARITY_FILE_NAME));

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let recommendations_count = file
            .recommendations_count
            .unwrap_or(cli.recommendations_count);
        if recommendations_count == 0 {
            bail!("recommendations_count must be at least 1");
        }

        let placeholder_image_url = file
            .placeholder_image_url
            .unwrap_or_else(|| DEFAULT_COVER_URL.to_string());

        let spotify_file = file.spotify.unwrap_or_default();
        let spotify_defaults = SpotifySettings::default();
        let spotify = SpotifySettings {
            accounts_url: spotify_file
                .accounts_url
                .unwrap_or(spotify_defaults.accounts_url),
            api_url: spotify_file.api_url.unwrap_or(spotify_defaults.api_url),
            timeout_sec: spotify_file
                .timeout_sec
                .unwrap_or(spotify_defaults.timeout_sec),
        };

        Ok(Self {
            data_dir,
            catalog_path,
            similarity_path,
            port,
            logging_level,
            recommendations_count,
            placeholder_image_url,
            spotify,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
