use anyhow::Result;
use std::{sync::Arc, time::Duration};

use tracing::{debug, error};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::page::{render_page, PageContent};
use super::{log_requests, state::*, ServerConfig};
use crate::enrichment::MetadataProvider;
use crate::recommend::{build_cards, RecommendError, RecommendationCard, Recommender};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub songs: usize,
}

#[derive(Deserialize, Debug)]
struct SongQuery {
    pub song: Option<String>,
}

#[derive(Serialize)]
struct RecommendResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    song: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    recommendations: Vec<RecommendationCard>,
}

impl RecommendResponse {
    fn error(song: Option<String>, message: String) -> Self {
        RecommendResponse {
            song,
            error: Some(message),
            recommendations: vec![],
        }
    }
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Runs one interaction on the blocking pool, the metadata lookups are
/// blocking calls made one after the other.
async fn recommend_cards(
    state: &ServerState,
    song: String,
) -> Result<Result<Vec<RecommendationCard>, RecommendError>> {
    let recommender = state.recommender.clone();
    let provider = state.metadata_provider.clone();
    let placeholder = state.config.placeholder_image_url.clone();

    let cards = tokio::task::spawn_blocking(move || {
        build_cards(&recommender, provider.as_ref(), &placeholder, &song)
    })
    .await?;
    Ok(cards)
}

async fn home_page(State(state): State<ServerState>, Query(query): Query<SongQuery>) -> Response {
    let outcome = match &query.song {
        None => None,
        Some(song) => match recommend_cards(&state, song.clone()).await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                error!("Recommendation task failed: {:?}", err);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
    };

    let titles = state.recommender.catalog().titles();
    let banner = state.startup_notice.as_deref();
    let html = match outcome {
        None => render_page(titles, None, banner, PageContent::Empty),
        Some(Ok(cards)) => render_page(
            titles,
            query.song.as_deref(),
            banner,
            PageContent::Cards(&cards),
        ),
        Some(Err(err)) => {
            debug!("{}", err);
            render_page(titles, None, banner, PageContent::Error(&err.to_string()))
        }
    };
    Html(html).into_response()
}

async fn stats(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        songs: state.recommender.catalog().len(),
    };
    Json(stats)
}

async fn list_songs(State(recommender): State<GuardedRecommender>) -> impl IntoResponse {
    let titles: Vec<String> = recommender.catalog().titles().map(String::from).collect();
    Json(titles)
}

async fn recommend(State(state): State<ServerState>, Query(query): Query<SongQuery>) -> Response {
    let song = match query.song {
        Some(song) => song,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(RecommendResponse::error(
                    None,
                    "Missing 'song' query parameter".to_string(),
                )),
            )
                .into_response()
        }
    };

    match recommend_cards(&state, song.clone()).await {
        Ok(Ok(cards)) => Json(RecommendResponse {
            song: Some(song),
            error: None,
            recommendations: cards,
        })
        .into_response(),
        Ok(Err(err)) => (
            StatusCode::NOT_FOUND,
            Json(RecommendResponse::error(Some(song), err.to_string())),
        )
            .into_response(),
        Err(err) => {
            error!("Recommendation task failed: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    recommender: Arc<Recommender>,
    metadata_provider: Arc<dyn MetadataProvider>,
    startup_notice: Option<String>,
) -> Result<Router> {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        recommender,
        metadata_provider,
        startup_notice,
        hash: env!("BUILD_HASH").to_owned(),
    };

    let api_routes: Router = Router::new()
        .route("/stats", get(stats))
        .route("/songs", get(list_songs))
        .route("/recommend", get(recommend))
        .with_state(state.clone());

    let app: Router = Router::new()
        .route("/", get(home_page))
        .with_state(state.clone())
        .nest("/v1", api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    recommender: Arc<Recommender>,
    metadata_provider: Arc<dyn MetadataProvider>,
    startup_notice: Option<String>,
    config: ServerConfig,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, recommender, metadata_provider, startup_notice)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
