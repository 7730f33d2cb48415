use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_recommender::catalog::{load_dataset, Dataset};
use song_recommender::config::{AppConfig, CliConfig, FileConfig};
use song_recommender::enrichment::{
    MetadataProvider, SpotifyClient, SpotifyCredentials, UnconfiguredProvider,
};
use song_recommender::recommend::Recommender;
use song_recommender::server::{run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding catalog.json and similarity.json.
    #[clap(long, value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,

    /// Path to the catalog file, defaults to <data-dir>/catalog.json.
    #[clap(long, value_parser = parse_path)]
    pub catalog: Option<PathBuf>,

    /// Path to the similarity matrix file, defaults to <data-dir>/similarity.json.
    #[clap(long, value_parser = parse_path)]
    pub similarity: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3002)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// How many songs to recommend for each request.
    #[clap(long, default_value_t = 5)]
    pub recommendations_count: usize,

    /// Only validate the dataset, then exit.
    #[clap(long)]
    pub check_only: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            data_dir: self.data_dir.clone(),
            catalog_path: self.catalog.clone(),
            similarity_path: self.similarity.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            recommendations_count: self.recommendations_count,
        }
    }
}

fn check_dataset(config: &AppConfig) -> Result<()> {
    let result = Dataset::build(&config.catalog_path, &config.similarity_path);

    if result.problems.is_empty() {
        println!("No problems found.");
    } else {
        println!("Found {} problems:", result.problems.len());
        for problem in result.problems.iter() {
            println!("  - {:?}", problem);
        }
    }

    match result.dataset {
        Some(dataset) => {
            println!("Dataset has {} songs.", dataset.catalog().len());
            Ok(())
        }
        None => anyhow::bail!("Dataset could not be loaded"),
    }
}

/// Picks the Spotify client when credentials are present. The blocking HTTP
/// client has to be built outside of the async runtime.
fn make_metadata_provider(
    config: &AppConfig,
) -> Result<(Arc<dyn MetadataProvider>, Option<String>)> {
    match SpotifyCredentials::from_env() {
        Ok(credentials) => {
            info!(
                "Spotify enrichment enabled against {}",
                config.spotify.api_url
            );
            let client = SpotifyClient::new(credentials, &config.spotify)?;
            Ok((Arc::new(client), None))
        }
        Err(missing) => {
            let notice = missing.to_string();
            warn!("{} Recommendations will use placeholder images.", notice);
            eprintln!("{}", notice);
            Ok((Arc::new(UnconfiguredProvider), Some(notice)))
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    if cli_args.check_only {
        return check_dataset(&config);
    }

    info!(
        "Loading dataset from {:?} and {:?}...",
        config.catalog_path, config.similarity_path
    );
    let dataset = load_dataset(&config.catalog_path, &config.similarity_path)?;
    let recommender = Arc::new(Recommender::with_count(
        dataset,
        config.recommendations_count,
    ));

    let (metadata_provider, startup_notice) = make_metadata_provider(&config)?;

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        placeholder_image_url: config.placeholder_image_url.clone(),
    };

    info!("Ready to serve at port {}!", config.port);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_server(
        recommender,
        metadata_provider.clone(),
        startup_notice,
        server_config,
    ));
    if let Err(err) = &result {
        error!("Server stopped: {:?}", err);
    }

    // Dropped after the runtime, the blocking client must not be torn down inside it
    drop(runtime);
    drop(metadata_provider);
    result
}
