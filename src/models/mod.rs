// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credential;
pub mod playlist;
pub mod track;

pub use credential::{Credential, CredentialDocument};
pub use playlist::{NewPlaylist, Playlist, PlaylistPatch, TrackReference};
pub use track::{LocalFile, RemotePlaylistSummary, TrackSummary};
