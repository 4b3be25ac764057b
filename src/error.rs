// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Spotify not configured: {0}")]
    Configuration(String),

    #[error("Not connected to Spotify")]
    NotConnected,

    #[error("Spotify rejected the stored access token")]
    SpotifyUnauthorized,

    #[error("Spotify API error: {error}")]
    SpotifyApi {
        error: String,
        details: Option<String>,
    },

    #[error("OAuth callback error: {0}")]
    OAuthCallback(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Upstream failure with a fixed summary and optional upstream message.
    pub fn spotify(error: impl Into<String>, details: Option<String>) -> Self {
        AppError::SpotifyApi {
            error: error.into(),
            details,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Configuration(msg) => (
                StatusCode::BAD_REQUEST,
                "Spotify not configured".to_string(),
                Some(msg),
            ),
            AppError::NotConnected => (
                StatusCode::UNAUTHORIZED,
                "Not connected to Spotify".to_string(),
                None,
            ),
            AppError::SpotifyUnauthorized => (
                StatusCode::UNAUTHORIZED,
                "Spotify access token rejected".to_string(),
                Some("Reconnect your Spotify account".to_string()),
            ),
            AppError::SpotifyApi { error, details } => (StatusCode::BAD_REQUEST, error, details),
            AppError::OAuthCallback(error) => (StatusCode::BAD_REQUEST, error, None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "File too large".to_string(),
                Some(msg),
            ),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                    None,
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
