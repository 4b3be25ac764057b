// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! A single pretty-printed JSON document on disk.
//!
//! Reads never fail: a missing, unreadable or corrupt file yields the
//! type's default value. Writes replace the whole file through a
//! temporary file and a rename, and all read-modify-write cycles on one
//! document are serialized by an async mutex.
//!
//! A corrupt file is renamed aside before the first write replaces it, so
//! its contents can still be recovered by hand.

use crate::error::AppError;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// What was found on disk.
enum Contents<T> {
    Missing,
    Parsed(T),
    Corrupt(serde_json::Error),
}

/// Typed handle to one JSON document.
pub struct JsonDocument<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    async fn read(&self) -> Result<Contents<T>, AppError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Contents::Missing),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        Ok(match serde_json::from_str(&contents) {
            Ok(value) => Contents::Parsed(value),
            Err(e) => Contents::Corrupt(e),
        })
    }

    /// Read the current document, falling back to the default value.
    pub async fn load(&self) -> T {
        match self.read().await {
            Ok(Contents::Parsed(value)) => value,
            Ok(Contents::Missing) => T::default(),
            Ok(Contents::Corrupt(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Corrupt document, treating as empty"
                );
                T::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read document, treating as empty");
                T::default()
            }
        }
    }

    /// Read, modify and write back while holding the write lock.
    ///
    /// If `f` fails nothing is written. A file that exists but cannot be
    /// read is never overwritten; one that cannot be parsed is moved aside
    /// first.
    pub async fn update<R, F>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut T) -> Result<R, AppError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut value = match self.read().await? {
            Contents::Parsed(value) => value,
            Contents::Missing => T::default(),
            Contents::Corrupt(e) => {
                let backup = self.set_aside().await?;
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "Corrupt document moved aside, starting empty"
                );
                T::default()
            }
        };
        let result = f(&mut value)?;
        self.write(&value).await?;
        Ok(result)
    }

    /// Rename the current file to `<name>.corrupt-<unix seconds>`.
    async fn set_aside(&self) -> Result<PathBuf, AppError> {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".corrupt-{}", Utc::now().timestamp()));
        let backup = PathBuf::from(name);

        tokio::fs::rename(&self.path, &backup)
            .await
            .map_err(|e| AppError::Storage(format!("rename {}: {}", self.path.display(), e)))?;
        Ok(backup)
    }

    async fn write(&self, value: &T) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Storage(format!("create {}: {}", parent.display(), e))
                })?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {}", tmp_path.display(), e)))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| AppError::Storage(format!("rename {}: {}", self.path.display(), e)))?;

        tracing::debug!(path = %self.path.display(), "Document saved");
        Ok(())
    }
}
