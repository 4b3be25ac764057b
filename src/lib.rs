// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tunedeck: a personal music backend
//!
//! This crate proxies a subset of the Spotify Web API (login, playlists,
//! track search) and adds locally stored playlists and uploaded music files.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{PlaylistStore, TokenStore};
use services::{MusicLibrary, SpotifyService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tokens: TokenStore,
    pub playlists: PlaylistStore,
    pub spotify: SpotifyService,
    pub library: MusicLibrary,
}

impl AppState {
    /// Wire up stores and services for `config`.
    pub fn new(config: Config) -> Self {
        let tokens = TokenStore::new(&config.data_dir);
        let playlists = PlaylistStore::new(&config.data_dir);
        let spotify = SpotifyService::new(&config, tokens.clone());
        let library = MusicLibrary::new(&config.music_dir);

        Self {
            config,
            tokens,
            playlists,
            spotify,
            library,
        }
    }
}
