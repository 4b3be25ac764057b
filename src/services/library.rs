// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local music directory: uploads and filename search.

use crate::error::AppError;
use crate::models::LocalFile;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// URL prefix under which stored files are served.
pub const MUSIC_URL_PREFIX: &str = "/api/music";

/// Service for storing and finding files in the music directory.
#[derive(Clone)]
pub struct MusicLibrary {
    dir: PathBuf,
}

impl MusicLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the music directory if needed.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `bytes` under `filename`, replacing any existing file.
    pub async fn store(&self, filename: &str, bytes: &[u8]) -> Result<LocalFile, AppError> {
        validate_filename(filename)?;

        self.ensure_dir().await.map_err(|e| {
            AppError::Storage(format!("create {}: {}", self.dir.display(), e))
        })?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {}", path.display(), e)))?;

        tracing::info!(filename, size = bytes.len(), "Music file stored");
        Ok(local_file(filename))
    }

    /// Files whose name contains `query`, ignoring case. A missing
    /// directory yields no results.
    pub async fn search(&self, query: &str) -> Result<Vec<LocalFile>, AppError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "read {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("read {}: {}", self.dir.display(), e)))?
        {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        let mut results: Vec<LocalFile> = filter_matches(&names, query)
            .into_iter()
            .map(local_file)
            .collect();
        results.sort_by(|a, b| a.filename.cmp(&b.filename));

        tracing::debug!(query, count = results.len(), "Local search");
        Ok(results)
    }
}

/// Case-insensitive substring match. An empty query matches everything.
pub fn matches_query(filename: &str, query: &str) -> bool {
    filename.to_lowercase().contains(&query.to_lowercase())
}

/// Names from `names` matching `query`.
pub fn filter_matches<'a>(names: &'a [String], query: &str) -> Vec<&'a str> {
    names
        .iter()
        .map(String::as_str)
        .filter(|name| matches_query(name, query))
        .collect()
}

/// Servable URL for a stored file.
pub fn file_url(filename: &str) -> String {
    format!("{}/{}", MUSIC_URL_PREFIX, urlencoding::encode(filename))
}

fn local_file(filename: &str) -> LocalFile {
    LocalFile {
        filename: filename.to_string(),
        url: file_url(filename),
    }
}

/// Uploaded names are used verbatim but must stay inside the directory.
pub fn validate_filename(filename: &str) -> Result<(), AppError> {
    if filename.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    let mut components = Path::new(filename).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal || filename.contains(['/', '\\']) {
        return Err(AppError::Validation(format!(
            "Invalid filename: {}",
            filename
        )));
    }
    Ok(())
}
