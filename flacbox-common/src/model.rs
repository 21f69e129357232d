//! Library and playback model types

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single audio file discovered by a library scan.
///
/// Immutable value: the in-memory track list is replaced wholesale on scan
/// completion, never patched. `uri` uniquely identifies the track within a
/// scan; `album_key` is derived from (artist, album-or-folder-fallback) at
/// scan time so that folder-named fallback buckets from different artists or
/// folders never collide with properly tagged albums.
///
/// Serialized field names match the on-disk cache format (camelCase, one
/// record per track). Optional numeric fields round-trip as JSON null/absent,
/// keeping "value is zero" distinct from "value is missing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Opaque stable identity from the document store
    pub uri: String,
    /// Display title (embedded tag, else file name with extension stripped)
    pub title: String,
    /// Display artist (embedded tag, else "Unknown Artist")
    pub artist: String,
    /// Display album (embedded tag, else parent folder name, else "Unknown Album")
    pub album: String,
    /// Derived grouping key (see scanner docs for the derivation rule)
    pub album_key: String,
    /// Embedded track number, if tagged
    pub track_number: Option<u32>,
    /// Embedded disc number, if tagged
    pub disc_number: Option<u32>,
    /// Duration in milliseconds, if known
    pub duration_ms: Option<u64>,
    /// Leaf name as listed by the document store
    pub file_name: String,
    /// Immediate parent folder name captured during the walk
    pub folder_hint: String,
}

/// Derived album record, grouped from the current track list.
///
/// Never persisted and never independently mutable; recomputed whenever the
/// track list changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Grouping key (= `Track::album_key` of every member)
    pub key: String,
    /// Album title from the first-seen member of the group
    pub album: String,
    /// Artist from the first-seen member of the group
    pub artist: String,
}

/// Atomic, immutable snapshot of the current playback state.
///
/// Broadcast last-write-wins on every relevant change; observers only ever
/// need the current value. A `None` `uri` means nothing is loaded: all other
/// display fields are at defaults and transport controls should be hidden.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NowPlaying {
    /// Title of the current track ("" when idle)
    pub title: String,
    /// Artist of the current track ("" when idle)
    pub artist: String,
    /// Album of the current track ("" when idle)
    pub album: String,
    /// Identity of the current track, None when no queue is loaded
    pub uri: Option<String>,
    /// Whether the media engine is currently playing
    pub is_playing: bool,
    /// Current position in milliseconds, clamped to [0, duration_ms]
    pub position_ms: u64,
    /// Duration of the current track in milliseconds (0 when unknown)
    pub duration_ms: u64,
    /// Embedded artwork of the current track, shared to keep snapshots cheap
    pub album_art: Option<Arc<Vec<u8>>>,
    /// True iff the loaded queue holds more than one track
    pub has_queue: bool,
}
