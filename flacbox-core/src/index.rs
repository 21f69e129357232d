//! Library index
//!
//! Pure, deterministic grouping and sorting over the current track list.
//! Recomputed from scratch whenever the list changes; no state, no manual
//! invalidation.

use flacbox_common::model::{Album, Track};
use std::collections::{BTreeSet, HashMap};

/// Group tracks into albums, sorted by `(artist, album)` ascending.
///
/// One album per `album_key`; artist and title come from the first-seen
/// member of each group (all members share them by construction of the key).
pub fn albums(tracks: &[Track]) -> Vec<Album> {
    let mut by_key: HashMap<&str, Album> = HashMap::new();
    for t in tracks {
        by_key.entry(t.album_key.as_str()).or_insert_with(|| Album {
            key: t.album_key.clone(),
            album: t.album.clone(),
            artist: t.artist.clone(),
        });
    }
    let mut out: Vec<Album> = by_key.into_values().collect();
    out.sort_by(|a, b| {
        (a.artist.as_str(), a.album.as_str()).cmp(&(b.artist.as_str(), b.album.as_str()))
    });
    out
}

/// Track listing for one album, in disc/track/title order.
///
/// Missing disc/track numbers sort as zero, before any numbered track.
pub fn album_tracks(tracks: &[Track], key: &str) -> Vec<Track> {
    let mut out: Vec<Track> = tracks
        .iter()
        .filter(|t| t.album_key == key)
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        let ka = (a.disc_number.unwrap_or(0), a.track_number.unwrap_or(0), a.title.as_str());
        let kb = (b.disc_number.unwrap_or(0), b.track_number.unwrap_or(0), b.title.as_str());
        ka.cmp(&kb)
    });
    out
}

/// Favorited tracks across the whole library, independent of album grouping.
pub fn favorites_only(tracks: &[Track], favorites: &BTreeSet<String>) -> Vec<Track> {
    let mut out: Vec<Track> = tracks
        .iter()
        .filter(|t| favorites.contains(&t.uri))
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        let ka = (
            a.artist.as_str(),
            a.album.as_str(),
            a.track_number.unwrap_or(0),
            a.title.as_str(),
        );
        let kb = (
            b.artist.as_str(),
            b.album.as_str(),
            b.track_number.unwrap_or(0),
            b.title.as_str(),
        );
        ka.cmp(&kb)
    });
    out
}
