// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence for the single Spotify credential.

use crate::db::{files, JsonDocument};
use crate::error::AppError;
use crate::models::{Credential, CredentialDocument};
use std::path::Path;
use std::sync::Arc;

/// File-backed store for the Spotify credential.
#[derive(Clone)]
pub struct TokenStore {
    doc: Arc<JsonDocument<CredentialDocument>>,
}

impl TokenStore {
    /// Store backed by `user_data.json` inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            doc: Arc::new(JsonDocument::new(data_dir.join(files::USER_DATA))),
        }
    }

    /// The stored credential, or `None` if not connected (or the file is
    /// missing or unreadable).
    pub async fn load(&self) -> Option<Credential> {
        self.doc.load().await.spotify_token
    }

    /// Overwrite the stored credential. `None` clears it.
    pub async fn save(&self, credential: Option<Credential>) -> Result<(), AppError> {
        let connected = credential.is_some();
        self.doc
            .update(move |document| {
                document.spotify_token = credential;
                Ok(())
            })
            .await?;

        tracing::info!(connected, "Spotify credential saved");
        Ok(())
    }

    pub async fn is_connected(&self) -> bool {
        self.load().await.is_some()
    }
}
