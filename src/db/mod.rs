//! Storage layer (JSON documents on local disk).

pub mod document;
pub mod playlists;
pub mod tokens;

pub use document::JsonDocument;
pub use playlists::PlaylistStore;
pub use tokens::TokenStore;

/// Document file names inside the data directory.
pub mod files {
    /// Spotify credential (`{"spotify_token": ...}`)
    pub const USER_DATA: &str = "user_data.json";
    /// Local playlists (JSON array)
    pub const PLAYLISTS: &str = "playlists.json";
}
