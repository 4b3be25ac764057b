// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify OAuth and proxy routes.

use crate::error::Result;
use crate::models::{RemotePlaylistSummary, TrackSummary};
use crate::routes::SuccessResponse;
use crate::services::spotify::CallbackParams;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/spotify/auth", get(auth_start))
        .route("/api/spotify/callback", get(auth_callback))
        .route("/api/spotify/status", get(status))
        .route("/api/spotify/playlists", get(list_playlists))
        .route("/api/spotify/playlists/{id}", get(playlist_details))
        .route("/api/spotify/search", get(search))
        .route("/api/spotify/disconnect", get(disconnect))
}

// ─── OAuth ───────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Return the Spotify authorization URL for the browser to open.
async fn auth_start(State(state): State<Arc<AppState>>) -> Result<Json<AuthUrlResponse>> {
    let auth_url = state.spotify.authorize_url()?;
    tracing::info!("Starting OAuth flow");
    Ok(Json(AuthUrlResponse { auth_url }))
}

/// OAuth callback - exchange code for tokens, then back to the frontend.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    state.spotify.handle_callback(params).await?;

    Ok(Redirect::temporary(&connected_redirect_url(
        &state.config.frontend_url,
    )))
}

/// Frontend URL with `spotify=connected` appended to its query string.
fn connected_redirect_url(frontend_url: &str) -> String {
    let separator = if frontend_url.contains('?') { '&' } else { '?' };
    format!("{}{}spotify=connected", frontend_url, separator)
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatusResponse {
    pub connected: bool,
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        connected: state.spotify.is_connected().await,
    })
}

async fn disconnect(State(state): State<Arc<AppState>>) -> Result<Json<SuccessResponse>> {
    state.spotify.disconnect().await?;
    Ok(SuccessResponse::new(true))
}

// ─── Playlists ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RemotePlaylistsResponse {
    pub playlists: Vec<RemotePlaylistSummary>,
}

async fn list_playlists(State(state): State<Arc<AppState>>) -> Result<Json<RemotePlaylistsResponse>> {
    let playlists = state.spotify.list_playlists().await?;
    tracing::debug!(count = playlists.len(), "Fetched Spotify playlists");
    Ok(Json(RemotePlaylistsResponse { playlists }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlaylistInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlaylistDetailsResponse {
    pub playlist: PlaylistInfo,
    pub tracks: Vec<TrackSummary>,
}

async fn playlist_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlaylistDetailsResponse>> {
    let details = state.spotify.playlist_details(&id).await?;
    let image = details.playlist.image();

    Ok(Json(PlaylistDetailsResponse {
        playlist: PlaylistInfo {
            id: details.playlist.id,
            name: details.playlist.name,
            description: details.playlist.description.unwrap_or_default(),
            image,
        },
        tracks: details.tracks,
    }))
}

// ─── Search ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TracksResponse {
    pub tracks: Vec<TrackSummary>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<TracksResponse>> {
    let tracks = state.spotify.search_tracks(&params.q).await?;
    tracing::debug!(query = %params.q, count = tracks.len(), "Spotify search");
    Ok(Json(TracksResponse { tracks }))
}
