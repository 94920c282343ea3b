//! HTTP surface
//!
//! Listing endpoints pass catalog JSON straight through. The play endpoints
//! answer 200 with an empty body, or 500 with one line naming what went
//! wrong. Details stay in the log.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::{Catalog, JellyfinClient};
use crate::config::Config;
use crate::device::{Launcher, RokuClient};
use crate::error::{CatalogError, PlayError};
use crate::models::{Episode, ItemPage, LibraryListing, Season};
use crate::player::PlayService;
use crate::resolver::Flatten;

/// Shared, read-only state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<dyn Catalog>,
    pub player: Arc<PlayService>,
}

impl AppState {
    /// Wire real Jellyfin and Roku clients from the configuration
    pub fn from_config(config: Config) -> Self {
        let catalog: Arc<dyn Catalog> = Arc::new(JellyfinClient::new(&config));
        let launcher: Arc<dyn Launcher> = Arc::new(RokuClient::new(&config));
        Self::new(config, catalog, launcher)
    }

    pub fn new(config: Config, catalog: Arc<dyn Catalog>, launcher: Arc<dyn Launcher>) -> Self {
        let player = PlayService::new(Arc::clone(&catalog), launcher, config.user_id.clone());
        Self {
            config: Arc::new(config),
            catalog,
            player: Arc::new(player),
        }
    }
}

/// Handler failure rendered as a plain-text 500
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, format!("{}\n", self.message)).into_response()
    }
}

impl From<PlayError> for AppError {
    fn from(err: PlayError) -> Self {
        Self::internal(format!("play failed: {}", err.kind()))
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        error!(error = %err, "catalog request failed");
        Self::internal(format!("catalog request failed: {}", err.kind()))
    }
}

type AppResult<T> = Result<T, AppError>;

/// Index document: every configured library with its items
#[derive(Debug, Serialize)]
pub struct Index {
    pub libraries: Vec<LibraryListing>,
    pub jellyfin_url: String,
    pub goroku_url: String,
    pub roku_url: String,
}

/// Build the router with request tracing
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/series/", get(default_library))
        .route("/series/{series}/seasons", get(list_seasons))
        .route(
            "/series/{series}/episodes",
            get(list_episodes).post(play_random_episode),
        )
        .route("/play/{item_id}", get(play_item))
        .route("/library/{library_id}", get(library))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router(state)).await
}

async fn index(State(state): State<AppState>) -> AppResult<Json<Index>> {
    let mut libraries = Vec::with_capacity(state.config.libraries.len());
    for library in &state.config.libraries {
        let page = state.catalog.fetch_library(&library.id).await.map_err(|e| {
            error!(library = %library.name, id = %library.id, "could not list library");
            AppError::from(e)
        })?;
        libraries.push(LibraryListing {
            id: library.id.clone(),
            name: library.name.clone(),
            page,
        });
    }

    Ok(Json(Index {
        libraries,
        jellyfin_url: state.config.jellyfin_url.clone(),
        goroku_url: state.config.goroku_url.clone(),
        roku_url: state.config.roku_url.clone(),
    }))
}

async fn default_library(State(state): State<AppState>) -> AppResult<Json<ItemPage>> {
    let page = state
        .catalog
        .fetch_library(&state.config.default_library)
        .await?;
    Ok(Json(page))
}

async fn library(
    State(state): State<AppState>,
    Path(library_id): Path<String>,
) -> AppResult<Json<ItemPage>> {
    let page = state.catalog.fetch_library(&library_id).await?;
    Ok(Json(page))
}

async fn list_seasons(
    State(state): State<AppState>,
    Path(series): Path<String>,
) -> AppResult<Json<Vec<Season>>> {
    let seasons = state.catalog.fetch_seasons(&series).await?;
    Ok(Json(seasons))
}

async fn list_episodes(
    State(state): State<AppState>,
    Path(series): Path<String>,
) -> AppResult<Json<Vec<Episode>>> {
    let episodes = state
        .player
        .resolver()
        .all_descendant_episodes(&series, Flatten::BySeason)
        .await?;
    Ok(Json(episodes))
}

async fn play_random_episode(
    State(state): State<AppState>,
    Path(series): Path<String>,
) -> AppResult<StatusCode> {
    state.player.play_random_episode(&series).await?;
    Ok(StatusCode::OK)
}

async fn play_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> AppResult<StatusCode> {
    state.player.play_request(&item_id).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceError;

    #[test]
    fn test_play_error_hides_detail() {
        let err = AppError::from(PlayError::UnsupportedItemKind {
            id: "secret-id".into(),
            kind: "BoxSet".into(),
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "play failed: UnsupportedItemKind");
    }

    #[test]
    fn test_device_error_message() {
        let err = AppError::from(PlayError::from(DeviceError::Rejected(503)));
        assert_eq!(err.message, "play failed: DeviceRejected");
    }
}
