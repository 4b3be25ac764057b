// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Spotify credentials are optional. When either the client ID or the
//! client secret is empty, every Spotify route that needs them answers
//! with a configuration error instead of failing at startup.

use ring::rand::{SecureRandom, SystemRandom};
use std::env;
use std::path::PathBuf;

const DEFAULT_REDIRECT_URI: &str = "http://localhost:5000/api/spotify/callback";
const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
const MIN_STATE_KEY_LEN: usize = 16;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Spotify ---
    /// Spotify OAuth client ID (empty when not configured)
    pub spotify_client_id: String,
    /// Spotify OAuth client secret (empty when not configured)
    pub spotify_client_secret: String,
    /// Redirect URI registered with the Spotify application
    pub spotify_redirect_uri: String,
    /// Base URL for `/authorize` and `/api/token`
    pub spotify_accounts_url: String,
    /// Base URL for the Web API
    pub spotify_api_url: String,

    // --- Local storage ---
    /// Directory holding `user_data.json` and `playlists.json`
    pub data_dir: PathBuf,
    /// Directory holding uploaded music files
    pub music_dir: PathBuf,
    /// Largest accepted upload body
    pub max_upload_bytes: usize,

    // --- Server ---
    /// Where the browser lands after a successful Spotify login
    pub frontend_url: String,
    /// HMAC key for signing the OAuth `state` parameter
    pub oauth_state_key: Vec<u8>,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let oauth_state_key = match env::var("OAUTH_STATE_KEY") {
            Ok(key) if key.len() < MIN_STATE_KEY_LEN => {
                return Err(ConfigError::Invalid {
                    name: "OAUTH_STATE_KEY",
                    reason: format!("must be at least {} bytes", MIN_STATE_KEY_LEN),
                });
            }
            Ok(key) => key.into_bytes(),
            Err(_) => {
                tracing::info!("OAUTH_STATE_KEY not set, generating a per-process key");
                generate_state_key()?
            }
        };

        Ok(Self {
            spotify_client_id: env::var("SPOTIFY_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            spotify_client_secret: env::var("SPOTIFY_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            spotify_redirect_uri: env::var("SPOTIFY_REDIRECT_URI")
                .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string()),
            spotify_accounts_url: env::var("SPOTIFY_ACCOUNTS_URL")
                .unwrap_or_else(|_| DEFAULT_ACCOUNTS_URL.to_string()),
            spotify_api_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            music_dir: env::var("MUSIC_DIR")
                .unwrap_or_else(|_| "static/music".to_string())
                .into(),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "/".to_string()),
            oauth_state_key,
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
        })
    }

    /// Config for tests: Spotify configured, local paths relative to the
    /// working directory. Tests normally repoint the directories.
    pub fn test_default() -> Self {
        Self {
            spotify_client_id: "test_client_id".to_string(),
            spotify_client_secret: "test_secret".to_string(),
            spotify_redirect_uri: "http://localhost:5000/api/spotify/callback".to_string(),
            spotify_accounts_url: "http://127.0.0.1:9".to_string(),
            spotify_api_url: "http://127.0.0.1:9/v1".to_string(),
            data_dir: PathBuf::from("data"),
            music_dir: PathBuf::from("static/music"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            frontend_url: "http://localhost:5173".to_string(),
            oauth_state_key: b"test_state_key_32_bytes_minimum!".to_vec(),
            port: 5000,
        }
    }

    /// Whether both Spotify client credentials are present.
    pub fn spotify_configured(&self) -> bool {
        !self.spotify_client_id.is_empty() && !self.spotify_client_secret.is_empty()
    }
}

fn generate_state_key() -> Result<Vec<u8>, ConfigError> {
    let mut key = vec![0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| ConfigError::KeyGeneration)?;
    Ok(key)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Failed to generate OAuth state key")]
    KeyGeneration,
}
