// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Track and playlist summaries returned by the API.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Normalized Spotify track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrackSummary {
    pub id: Option<String>,
    pub name: String,
    /// First listed artist, or "Unknown"
    pub artist: String,
    pub album: String,
    /// Whole seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration: u64,
    pub preview_url: Option<String>,
    /// First album cover image
    pub image: Option<String>,
    pub uri: Option<String>,
}

/// One of the user's Spotify playlists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RemotePlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub tracks_total: u32,
    pub owner: Option<String>,
}

/// A file in the local music directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LocalFile {
    pub filename: String,
    pub url: String,
}
