//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own dataset files.

use super::constants::*;
use super::fixtures::create_test_dataset;
use super::provider::FakeProvider;
use song_recommender::catalog::load_dataset;
use song_recommender::enrichment::MetadataProvider;
use song_recommender::recommend::Recommender;
use song_recommender::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated dataset.
///
/// When dropped, the server gracefully shuts down and temp files are removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    // Private fields - keep resources alive until drop
    _temp_dataset_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server backed by `FakeProvider` on a random port.
    pub async fn spawn() -> Self {
        Self::spawn_with(Arc::new(FakeProvider::default()), None).await
    }

    /// Spawns a server with the given metadata provider and startup notice.
    ///
    /// # Panics
    ///
    /// Panics if the dataset can't be written or loaded, the port can't be
    /// bound, or the server doesn't become ready in time.
    pub async fn spawn_with(
        provider: Arc<dyn MetadataProvider>,
        startup_notice: Option<String>,
    ) -> Self {
        let (temp_dataset_dir, catalog_path, similarity_path) =
            create_test_dataset().expect("Failed to create test dataset");

        let dataset =
            load_dataset(&catalog_path, &similarity_path).expect("Failed to load test dataset");
        let recommender = Arc::new(Recommender::new(dataset));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            ..Default::default()
        };
        let app = make_app(config, recommender, provider, startup_notice)
            .expect("Failed to build app");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            _temp_dataset_dir: temp_dataset_dir,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_for_ready().await;
        server
    }

    /// Polls the stats endpoint until the server answers.
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client
                .get(format!("{}/v1/stats", self.base_url))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
