//! Library scanner
//!
//! Depth-first walk over a document store producing Track records. Every
//! per-entry fault (unreadable entry, unopenable document, extraction
//! failure) is absorbed so one bad file never costs its siblings or other
//! subtrees; a whole-tree fault degrades to an empty result. Downstream
//! grouping and sorting provide deterministic ordering, so traversal order
//! itself does not matter.

use crate::meta::MetadataExtractor;
use crate::store::DocumentStore;
use flacbox_common::model::Track;
use tracing::{debug, info};

/// Artist fallback when no artist tag is present
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Album fallback when neither an album tag nor a folder name is present
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Derive the album grouping key for a file.
///
/// A file with an explicit embedded album tag groups by `artist||album`;
/// without one it groups by `artist||FOLDER||folder`. The distinct folder
/// form keeps folder-named fallback buckets from different artists or
/// folders apart, and keeps untagged files from merging into properly
/// tagged albums that happen to share a nominal title.
pub fn album_key(artist: &str, album_tag: Option<&str>, folder: &str) -> String {
    match album_tag.map(str::trim).filter(|a| !a.is_empty()) {
        Some(album) => format!("{}||{}", artist, album),
        None => format!("{}||FOLDER||{}", artist, folder),
    }
}

/// Scan the tree rooted at `root`, returning every playable track found.
///
/// Completes (possibly empty) even when arbitrary subtrees are unreadable.
/// Blocking: run under `spawn_blocking` when driven from async code.
pub fn scan_tree(
    store: &dyn DocumentStore,
    extractor: &dyn MetadataExtractor,
    root: &str,
) -> Vec<Track> {
    let mut out = Vec::new();
    walk(store, extractor, root, &mut out);
    info!("library scan found {} tracks", out.len());
    out
}

fn walk(
    store: &dyn DocumentStore,
    extractor: &dyn MetadataExtractor,
    dir: &str,
    out: &mut Vec<Track>,
) {
    if !store.is_container(dir) {
        return;
    }

    let folder_name = store.name(dir);

    for child in store.list_children(dir) {
        if store.is_container(&child) {
            walk(store, extractor, &child, out);
            continue;
        }

        let Some(name) = store.name(&child) else {
            continue;
        };
        if !name.to_ascii_lowercase().ends_with(".flac") {
            continue;
        }

        // Some providers list documents they cannot actually serve; probe
        // before committing to extraction. The handle drops immediately.
        match store.open_for_read(&child) {
            Ok(_) => {}
            Err(e) => {
                debug!("skipping unopenable entry {}: {}", child, e);
                continue;
            }
        }

        let meta = match store.open_for_read(&child) {
            Ok(handle) => extractor.extract(handle),
            Err(e) => {
                debug!("entry {} vanished between probe and read: {}", child, e);
                continue;
            }
        };

        let folder_album = folder_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

        // Trimmed once; the key and the displayed album must come from the
        // same string or padded tags split an album in the UI.
        let album_tag = meta
            .album
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        let artist = meta
            .artist
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let title = meta
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| file_stem(&name));
        let key = album_key(&artist, album_tag.as_deref(), &folder_album);
        let album = album_tag.unwrap_or_else(|| folder_album.clone());

        out.push(Track {
            uri: store.identity(&child),
            title,
            artist,
            album,
            album_key: key,
            track_number: meta.track_number,
            disc_number: meta.disc_number,
            duration_ms: meta.duration_ms,
            file_name: name,
            folder_hint: folder_album,
        });
    }
}

fn file_stem(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name.to_string(),
    }
}
