use crate::config::Config;
use crate::debounce::debounced;
use crate::details::{self, DetailsView};
use crate::discover::{self, Card, TrailerSection};
use crate::media::{MediaSection, MediaTab};
use crate::person::{self, PersonView};
use crate::seasons::{self, SeasonView};
use crate::tmdb::{MediaType, TmdbApi, TmdbClient, TmdbError, TrailerFilter, TrendingPeriod};
use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

const LIVE_SEARCH_BUFFER: usize = 32;

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub watch_region: String,
    pub search_debounce: Duration,
}

impl AppState {
    pub fn new(tmdb: Arc<dyn TmdbApi>, config: &Config) -> Self {
        Self {
            tmdb,
            watch_region: config.watch_region.clone(),
            search_debounce: config.search_debounce,
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    info!(
        "Using TMDB at {} (language {}, region {})",
        config.tmdb_api_base, config.language, config.watch_region
    );

    let state = AppState::new(tmdb, &config);
    let app = build_router(state);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/popular", get(popular))
        .route("/api/trending/:period", get(trending))
        .route("/api/trailers", get(trailers))
        .route("/api/search", get(search))
        .route("/api/search/live", get(live_search))
        .route("/api/details/:kind/:id", get(title_details))
        .route("/api/details/:kind/:id/media", get(title_media))
        .route("/api/tv/:id/season/:number", get(season))
        .route("/api/person/:id", get(person_details))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Handler error: TMDB 404s pass through, every other failure is a bad
/// gateway.
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<TmdbError>() {
            Some(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        };
        if status == StatusCode::NOT_FOUND {
            warn!("Not found upstream: {:#}", self.0);
        } else {
            error!("Request failed: {:?}", self.0);
        }
        (status, Json(json!({ "error": format!("{:#}", self.0) }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, AppError>;

async fn health() -> &'static str {
    "OK"
}

async fn popular(State(state): State<AppState>) -> ApiResult<Vec<Card>> {
    Ok(Json(discover::popular(state.tmdb.as_ref()).await?))
}

async fn trending(
    State(state): State<AppState>,
    Path(period): Path<TrendingPeriod>,
) -> ApiResult<Vec<Card>> {
    Ok(Json(discover::trending(state.tmdb.as_ref(), period).await?))
}

#[derive(Debug, Deserialize)]
struct TrailerParams {
    #[serde(default)]
    filter: TrailerFilter,
}

async fn trailers(
    State(state): State<AppState>,
    Query(params): Query<TrailerParams>,
) -> ApiResult<TrailerSection> {
    Ok(Json(
        discover::trailers(state.tmdb.as_ref(), params.filter).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Card>,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchResponse> {
    let results = discover::search(state.tmdb.as_ref(), &params.q).await?;
    Ok(Json(SearchResponse {
        query: params.q.trim().to_string(),
        results,
    }))
}

async fn live_search(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_live_search(socket, state))
}

/// Every text frame is the current search box value; one reply goes out per
/// idle period.
async fn run_live_search(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (terms_tx, terms_rx) = mpsc::channel::<String>(LIVE_SEARCH_BUFFER);
    let mut settled = debounced(terms_rx, state.search_debounce);

    let reader = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(term) => {
                    if terms_tx.send(term).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    while let Some(term) = settled.recv().await {
        let query = term.trim().to_string();
        let reply = match discover::search(state.tmdb.as_ref(), &query).await {
            Ok(results) => json!({ "query": query, "results": results }),
            Err(e) => {
                warn!("Live search for '{}' failed: {:#}", query, e);
                json!({ "query": query, "error": format!("{:#}", e) })
            }
        };
        if sender.send(Message::Text(reply.to_string())).await.is_err() {
            break;
        }
    }

    reader.abort();
    debug!("Live search session closed");
}

async fn title_details(
    State(state): State<AppState>,
    Path((kind, id)): Path<(MediaType, i64)>,
) -> ApiResult<DetailsView> {
    Ok(Json(
        details::details(state.tmdb.as_ref(), kind, id, &state.watch_region).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct MediaParams {
    #[serde(default)]
    tab: MediaTab,
}

async fn title_media(
    State(state): State<AppState>,
    Path((kind, id)): Path<(MediaType, i64)>,
    Query(params): Query<MediaParams>,
) -> ApiResult<MediaSection> {
    let (videos, images) =
        tokio::try_join!(state.tmdb.videos(kind, id), state.tmdb.images(kind, id))?;
    Ok(Json(MediaSection::build(
        &videos.results,
        &images,
        params.tab,
    )))
}

async fn season(
    State(state): State<AppState>,
    Path((id, number)): Path<(i64, u32)>,
) -> ApiResult<SeasonView> {
    Ok(Json(seasons::season(state.tmdb.as_ref(), id, number).await?))
}

async fn person_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<PersonView> {
    Ok(Json(person::person(state.tmdb.as_ref(), id).await?))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
