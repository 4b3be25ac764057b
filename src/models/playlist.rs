// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Locally stored playlist model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Name given to playlists created without one.
pub const DEFAULT_PLAYLIST_NAME: &str = "New Playlist";

/// A caller-supplied track entry. Its shape is not validated.
pub type TrackReference = Value;

/// Partial update applied to a playlist with a shallow merge.
pub type PlaylistPatch = Map<String, Value>;

/// Playlist stored in `playlists.json`.
///
/// Older files may hold `null` for any of the optional fields; those read
/// back as the field's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Playlist {
    /// Decimal string of the playlist count at creation time (not unique
    /// once playlists have been deleted)
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Usually an image URL, but any JSON value a client stored is kept
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub image: Option<Value>,
    /// Ordered track references
    #[serde(default, deserialize_with = "null_as_default")]
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<unknown>"))]
    pub tracks: Vec<TrackReference>,
    /// RFC 3339 creation time
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    /// Any other top-level fields a client stored on the playlist
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Playlist {
    /// Shallow-merge `patch` over this playlist: every top-level key in the
    /// patch replaces the stored value, other fields are kept.
    ///
    /// Fails if the merged document is no longer a valid playlist (for
    /// example `name` set to a number).
    pub fn merged(&self, patch: &PlaylistPatch) -> Result<Playlist, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            for (key, new_value) in patch {
                fields.insert(key.clone(), new_value.clone());
            }
        }
        serde_json::from_value(value)
    }
}

/// Request body for creating a playlist. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlaylist {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tracks: Option<Vec<TrackReference>>,
}

impl NewPlaylist {
    /// Build the stored record with the given id and creation time.
    pub fn into_playlist(self, id: String, created_at: String) -> Playlist {
        Playlist {
            id,
            name: self
                .name
                .unwrap_or_else(|| DEFAULT_PLAYLIST_NAME.to_string()),
            description: self.description.unwrap_or_default(),
            image: self.image.map(Value::String),
            tracks: self.tracks.unwrap_or_default(),
            created_at,
            extra: Map::new(),
        }
    }
}
