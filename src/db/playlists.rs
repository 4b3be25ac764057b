// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence for local playlists.
//!
//! New playlists get `id = count + 1`. After a delete this can hand out an
//! id that is still in use; lookups by id act on the first match, deletes
//! remove every match.

use crate::db::{files, JsonDocument};
use crate::error::AppError;
use crate::models::{NewPlaylist, Playlist, PlaylistPatch};
use crate::time_utils::format_utc_rfc3339;
use std::path::Path;
use std::sync::Arc;

/// File-backed store for local playlists.
#[derive(Clone)]
pub struct PlaylistStore {
    doc: Arc<JsonDocument<Vec<Playlist>>>,
}

impl PlaylistStore {
    /// Store backed by `playlists.json` inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            doc: Arc::new(JsonDocument::new(data_dir.join(files::PLAYLISTS))),
        }
    }

    /// All playlists in stored order.
    pub async fn list(&self) -> Vec<Playlist> {
        self.doc.load().await
    }

    /// Append a new playlist and return it.
    pub async fn create(&self, fields: NewPlaylist) -> Result<Playlist, AppError> {
        let created_at = format_utc_rfc3339(chrono::Utc::now());

        let playlist = self
            .doc
            .update(move |playlists| {
                let id = (playlists.len() + 1).to_string();
                let playlist = fields.into_playlist(id, created_at);
                playlists.push(playlist.clone());
                Ok(playlist)
            })
            .await?;

        tracing::info!(id = %playlist.id, name = %playlist.name, "Playlist created");
        Ok(playlist)
    }

    /// Shallow-merge `patch` into the first playlist with `id`.
    ///
    /// Reports success even when no playlist matches.
    pub async fn update(&self, id: &str, patch: &PlaylistPatch) -> Result<bool, AppError> {
        let found = self
            .doc
            .update(|playlists| {
                let Some(playlist) = playlists.iter_mut().find(|p| p.id == id) else {
                    return Ok(false);
                };
                *playlist = playlist
                    .merged(patch)
                    .map_err(|e| AppError::Validation(format!("Invalid playlist update: {}", e)))?;
                Ok(true)
            })
            .await?;

        if !found {
            tracing::debug!(id, "Update for unknown playlist ignored");
        }
        Ok(true)
    }

    /// Remove every playlist with `id`. Always reports success.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let removed = self
            .doc
            .update(|playlists| {
                let before = playlists.len();
                playlists.retain(|p| p.id != id);
                Ok(before - playlists.len())
            })
            .await?;

        tracing::info!(id, removed, "Playlist deleted");
        Ok(true)
    }
}
