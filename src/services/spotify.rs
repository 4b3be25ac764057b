// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify API client for OAuth, playlists and track search.
//!
//! Handles:
//! - Authorization URL construction and code exchange
//! - Playlist listing and playlist track details
//! - Track search
//! - Mapping upstream failures (401 vs. everything else)

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Credential, RemotePlaylistSummary, TrackSummary};
use serde::Deserialize;

/// Scopes requested during authorization.
pub const SPOTIFY_SCOPES: &str =
    "playlist-read-private playlist-read-collaborative user-library-read streaming";

/// Number of tracks requested per search.
pub const SEARCH_LIMIT: u32 = 20;

/// Spotify API client.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    accounts_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl SpotifyClient {
    /// Create a client from the application config.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            accounts_url: config.spotify_accounts_url.trim_end_matches('/').to_string(),
            api_url: config.spotify_api_url.trim_end_matches('/').to_string(),
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.spotify_redirect_uri.clone(),
        }
    }

    /// URL the browser is sent to for user consent.
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}/authorize?\
             client_id={}&\
             response_type=code&\
             redirect_uri={}&\
             scope={}&\
             state={}",
            self.accounts_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(SPOTIFY_SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, AppError> {
        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_url))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::spotify("Failed to get access token", Some(e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Spotify token exchange failed");
            return Err(AppError::spotify(
                "Failed to get access token",
                upstream_message(&body),
            ));
        }

        let token: TokenExchangeResponse = response.json().await.map_err(|e| {
            AppError::spotify(
                "Failed to get access token",
                Some(format!("Failed to parse token response: {}", e)),
            )
        })?;

        Ok(Credential {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
        })
    }

    /// The current user's playlists (first page).
    pub async fn my_playlists(
        &self,
        access_token: &str,
    ) -> Result<Vec<SpotifyPlaylist>, AppError> {
        let url = format!("{}/me/playlists", self.api_url);
        let page: Paging<SpotifyPlaylist> = self
            .get_json(&url, access_token, &[], "Failed to fetch playlists")
            .await?;
        Ok(page.items)
    }

    /// A single playlist's metadata.
    pub async fn playlist(
        &self,
        access_token: &str,
        playlist_id: &str,
    ) -> Result<SpotifyPlaylist, AppError> {
        let url = format!(
            "{}/playlists/{}",
            self.api_url,
            urlencoding::encode(playlist_id)
        );
        self.get_json(&url, access_token, &[], "Failed to fetch playlist")
            .await
    }

    /// Tracks of a playlist (first page). Entries without a track are dropped.
    pub async fn playlist_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
    ) -> Result<Vec<SpotifyTrack>, AppError> {
        let url = format!(
            "{}/playlists/{}/tracks",
            self.api_url,
            urlencoding::encode(playlist_id)
        );
        let page: Paging<PlaylistItem> = self
            .get_json(&url, access_token, &[], "Failed to fetch playlist tracks")
            .await?;
        Ok(page.items.into_iter().filter_map(|item| item.track).collect())
    }

    /// Search the catalog for tracks.
    pub async fn search_tracks(
        &self,
        access_token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SpotifyTrack>, AppError> {
        let url = format!("{}/search", self.api_url);
        let limit = limit.to_string();
        let response: SearchResponse = self
            .get_json(
                &url,
                access_token,
                &[("q", query), ("type", "track"), ("limit", limit.as_str())],
                "Failed to search Spotify",
            )
            .await?;
        Ok(response.tracks.map(|page| page.items).unwrap_or_default())
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::spotify(context, Some(e.to_string())))?;

        self.check_response_json(response, context).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Expired or revoked token; there is no refresh, the user reconnects
            if status.as_u16() == 401 {
                tracing::warn!(body = %body, "Spotify rejected access token (401)");
                return Err(AppError::SpotifyUnauthorized);
            }

            tracing::warn!(status = %status, body = %body, "{}", context);
            return Err(AppError::spotify(
                context,
                upstream_message(&body).or_else(|| Some(format!("HTTP {}", status))),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::spotify(context, Some(format!("JSON parse error: {}", e))))
    }
}

/// Extract a readable message from a Spotify error body.
///
/// The Web API answers `{"error": {"status": .., "message": ..}}`; the
/// accounts service answers `{"error": .., "error_description": ..}`.
fn upstream_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value["error"]["message"].as_str() {
            return Some(message.to_string());
        }
        if let Some(description) = value["error_description"].as_str() {
            return Some(description.to_string());
        }
        if let Some(error) = value["error"].as_str() {
            return Some(error.to_string());
        }
    }

    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct TokenExchangeResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaylistItem {
    #[serde(default)]
    track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<Paging<SpotifyTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Option<Vec<SpotifyImage>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyOwner {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTracksRef {
    #[serde(default)]
    pub total: u32,
}

/// Playlist object (simplified or full).
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<SpotifyImage>>,
    #[serde(default)]
    pub tracks: Option<SpotifyTracksRef>,
    #[serde(default)]
    pub owner: Option<SpotifyOwner>,
}

impl SpotifyPlaylist {
    /// First cover image, if any.
    pub fn image(&self) -> Option<String> {
        first_image(self.images.as_deref())
    }
}

/// Track object.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub album: Option<SpotifyAlbum>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

fn first_image(images: Option<&[SpotifyImage]>) -> Option<String> {
    images.and_then(|images| images.first()).map(|i| i.url.clone())
}

impl From<SpotifyTrack> for TrackSummary {
    fn from(track: SpotifyTrack) -> Self {
        let artist = track
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_else(|| "Unknown".to_string());
        let (album, image) = match track.album {
            Some(album) => {
                let image = first_image(album.images.as_deref());
                (album.name, image)
            }
            None => ("Unknown".to_string(), None),
        };

        TrackSummary {
            id: track.id,
            name: track.name,
            artist,
            album,
            duration: track.duration_ms / 1000,
            preview_url: track.preview_url,
            image,
            uri: track.uri,
        }
    }
}

impl From<SpotifyPlaylist> for RemotePlaylistSummary {
    fn from(playlist: SpotifyPlaylist) -> Self {
        let image = playlist.image();
        RemotePlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description.unwrap_or_default(),
            image,
            tracks_total: playlist.tracks.map(|t| t.total).unwrap_or(0),
            owner: playlist.owner.and_then(|o| o.display_name),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SpotifyService - High-level service with credential lookup
// ─────────────────────────────────────────────────────────────────────────────

use crate::db::TokenStore;
use crate::services::OAuthStateSigner;

/// Playlist metadata plus its tracks.
#[derive(Debug, Clone)]
pub struct PlaylistDetails {
    pub playlist: SpotifyPlaylist,
    pub tracks: Vec<TrackSummary>,
}

/// Parameters Spotify sends to the redirect URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// High-level Spotify service.
///
/// Reads the stored credential before every proxied call. Tokens are used
/// exactly as stored; when Spotify rejects one the caller gets
/// `SpotifyUnauthorized` and must reconnect.
#[derive(Clone)]
pub struct SpotifyService {
    client: SpotifyClient,
    tokens: TokenStore,
    state_signer: OAuthStateSigner,
    configured: bool,
}

impl SpotifyService {
    pub fn new(config: &Config, tokens: TokenStore) -> Self {
        Self {
            client: SpotifyClient::new(config),
            tokens,
            state_signer: OAuthStateSigner::new(config.oauth_state_key.clone()),
            configured: config.spotify_configured(),
        }
    }

    fn require_configured(&self) -> Result<(), AppError> {
        if self.configured {
            Ok(())
        } else {
            Err(AppError::Configuration(
                "Please set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET environment variables"
                    .to_string(),
            ))
        }
    }

    /// Stored access token, or `NotConnected`.
    async fn access_token(&self) -> Result<String, AppError> {
        self.tokens
            .load()
            .await
            .map(|credential| credential.access_token)
            .ok_or(AppError::NotConnected)
    }

    // ─── OAuth ───────────────────────────────────────────────────────────────

    /// Authorization URL with a freshly signed state.
    pub fn authorize_url(&self) -> Result<String, AppError> {
        self.require_configured()?;
        let state = self.state_signer.issue()?;
        Ok(self.client.authorize_url(&state))
    }

    /// Handle the redirect back from Spotify: exchange the code and store the
    /// credential. On any failure the stored credential is left untouched.
    pub async fn handle_callback(&self, params: CallbackParams) -> Result<(), AppError> {
        if let Some(error) = params.error {
            tracing::warn!(error = %error, "OAuth error from Spotify");
            return Err(AppError::OAuthCallback(error));
        }

        let code = params
            .code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::OAuthCallback("No code provided".to_string()))?;

        let state_ok = params
            .state
            .as_deref()
            .is_some_and(|s| self.state_signer.verify(s));
        if !state_ok {
            return Err(AppError::OAuthCallback(
                "Invalid or missing state parameter".to_string(),
            ));
        }

        self.require_configured()?;

        tracing::info!("Exchanging authorization code for tokens");
        let credential = self.client.exchange_code(&code).await?;
        self.tokens.save(Some(credential)).await?;

        tracing::info!("Spotify connected");
        Ok(())
    }

    pub async fn is_connected(&self) -> bool {
        self.tokens.is_connected().await
    }

    /// Forget the stored credential. Idempotent.
    pub async fn disconnect(&self) -> Result<(), AppError> {
        self.tokens.save(None).await?;
        tracing::info!("Spotify disconnected");
        Ok(())
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// The user's Spotify playlists.
    pub async fn list_playlists(&self) -> Result<Vec<RemotePlaylistSummary>, AppError> {
        let access_token = self.access_token().await?;
        let playlists = self.client.my_playlists(&access_token).await?;
        Ok(playlists.into_iter().map(Into::into).collect())
    }

    /// A playlist's metadata and tracks.
    pub async fn playlist_details(&self, playlist_id: &str) -> Result<PlaylistDetails, AppError> {
        let access_token = self.access_token().await?;
        let playlist = self.client.playlist(&access_token, playlist_id).await?;
        let tracks = self
            .client
            .playlist_tracks(&access_token, playlist_id)
            .await?;

        Ok(PlaylistDetails {
            playlist,
            tracks: tracks.into_iter().map(Into::into).collect(),
        })
    }

    /// Search Spotify for tracks matching `query`.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<TrackSummary>, AppError> {
        self.require_configured()?;
        let access_token = self.access_token().await?;
        if query.is_empty() {
            return Err(AppError::Validation("No query provided".to_string()));
        }

        let tracks = self
            .client
            .search_tracks(&access_token, query, SEARCH_LIMIT)
            .await?;
        Ok(tracks.into_iter().map(Into::into).collect())
    }
}
