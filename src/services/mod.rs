// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod library;
pub mod oauth_state;
pub mod spotify;

pub use library::MusicLibrary;
pub use oauth_state::OAuthStateSigner;
pub use spotify::{SpotifyClient, SpotifyService};
