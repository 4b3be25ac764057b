//! Spotify credential model for storage.

use serde::{Deserialize, Serialize};

/// OAuth tokens granted by Spotify.
///
/// Stored as-is; `expires_in` is never checked locally, so an expired
/// access token keeps being sent until Spotify rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds as reported by the token endpoint
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// On-disk shape of `user_data.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialDocument {
    /// `null` when not connected
    #[serde(default)]
    pub spotify_token: Option<Credential>,
    /// Other keys already present in the file, written back untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
