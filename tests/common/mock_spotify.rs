//! In-process stand-in for the Spotify accounts and Web API endpoints.
//!
//! Runs on its own thread and runtime so it can serve the blocking client
//! used by plain `#[test]` functions.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use song_recommender::enrichment::SpotifySettings;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

pub const MOCK_CLIENT_ID: &str = "test-client";
pub const MOCK_CLIENT_SECRET: &str = "test-secret";

/// How the search endpoint answers for a given track title.
#[derive(Clone)]
pub enum MockTrack {
    /// Album images as (url, width, height), plus the listening link.
    Found {
        images: Vec<(String, u32, u32)>,
        link: Option<String>,
    },
    Missing,
    Error(u16),
}

#[derive(Default)]
struct MockState {
    tracks: HashMap<String, MockTrack>,
    token_requests: AtomicUsize,
    searches: Mutex<Vec<String>>,
    reject_credentials: bool,
    /// Rejects the next search with 401, as Spotify does for expired tokens.
    expire_next_search: AtomicBool,
}

pub struct MockSpotify {
    pub base_url: String,
    state: Arc<MockState>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
    #[serde(rename = "type")]
    kind: String,
    limit: usize,
}

fn title_from_query(q: &str) -> &str {
    q.strip_prefix("track:")
        .and_then(|rest| rest.split(" artist:").next())
        .unwrap_or(q)
}

async fn token(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);

    let has_basic_auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if state.reject_credentials || !has_basic_auth {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_client" })),
        )
            .into_response();
    }

    let count = state.token_requests.load(Ordering::SeqCst);
    Json(json!({
        "access_token": format!("token-{}", count),
        "token_type": "Bearer",
        "expires_in": 3600
    }))
    .into_response()
}

async fn search(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer token-"));
    if !authorized || state.expire_next_search.swap(false, Ordering::SeqCst) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if params.kind != "track" || params.limit != 1 {
        return StatusCode::BAD_REQUEST.into_response();
    }

    state.searches.lock().unwrap().push(params.q.clone());

    let items = match state.tracks.get(title_from_query(&params.q)) {
        Some(MockTrack::Error(status)) => {
            return StatusCode::from_u16(*status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
        Some(MockTrack::Found { images, link }) => {
            let images: Vec<_> = images
                .iter()
                .map(|(url, width, height)| json!({ "url": url, "width": width, "height": height }))
                .collect();
            let external_urls = match link {
                Some(link) => json!({ "spotify": link }),
                None => json!({}),
            };
            vec![json!({
                "name": title_from_query(&params.q),
                "album": { "images": images },
                "external_urls": external_urls
            })]
        }
        Some(MockTrack::Missing) | None => vec![],
    };

    Json(json!({ "tracks": { "items": items } })).into_response()
}

impl MockSpotify {
    pub fn start(tracks: HashMap<String, MockTrack>) -> Self {
        Self::start_with(tracks, false)
    }

    pub fn start_rejecting_credentials() -> Self {
        Self::start_with(HashMap::new(), true)
    }

    fn start_with(tracks: HashMap<String, MockTrack>, reject_credentials: bool) -> Self {
        let state = Arc::new(MockState {
            tracks,
            reject_credentials,
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/search", get(search))
            .with_state(state.clone());

        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock Spotify");
        listener
            .set_nonblocking(true)
            .expect("Failed to set non-blocking");
        let port = listener.local_addr().expect("No local address").port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build mock runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("Failed to adopt listener");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        shutdown_rx.await.ok();
                    })
                    .await
                    .expect("Mock Spotify failed");
            });
        });

        MockSpotify {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        }
    }

    /// Both endpoints live on the same mock server.
    pub fn settings(&self) -> SpotifySettings {
        SpotifySettings {
            accounts_url: self.base_url.clone(),
            api_url: self.base_url.clone(),
            timeout_sec: 5,
        }
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> Vec<String> {
        self.state.searches.lock().unwrap().clone()
    }

    pub fn expire_token(&self) {
        self.state.expire_next_search.store(true, Ordering::SeqCst);
    }
}

impl Drop for MockSpotify {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
