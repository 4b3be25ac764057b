// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local playlist CRUD routes.

use crate::error::Result;
use crate::models::{NewPlaylist, Playlist, PlaylistPatch};
use crate::routes::SuccessResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/playlists", get(list_playlists).post(create_playlist))
        .route(
            "/api/playlists/{id}",
            put(update_playlist).delete(delete_playlist),
        )
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlaylistsResponse {
    pub playlists: Vec<Playlist>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlaylistResponse {
    pub playlist: Playlist,
}

async fn list_playlists(State(state): State<Arc<AppState>>) -> Json<PlaylistsResponse> {
    Json(PlaylistsResponse {
        playlists: state.playlists.list().await,
    })
}

async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<NewPlaylist>,
) -> Result<Json<PlaylistResponse>> {
    let playlist = state.playlists.create(fields).await?;
    Ok(Json(PlaylistResponse { playlist }))
}

/// Shallow-merge the request body into the playlist.
/// Unknown ids are a silent no-op that still reports success.
async fn update_playlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<PlaylistPatch>,
) -> Result<Json<SuccessResponse>> {
    let success = state.playlists.update(&id, &patch).await?;
    Ok(SuccessResponse::new(success))
}

async fn delete_playlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let success = state.playlists.delete(&id).await?;
    Ok(SuccessResponse::new(success))
}
