//! Library cache
//!
//! Persists the scan result as a flat, ordered JSON list so a cold start can
//! skip the full rescan. The cache is an optimization, never a source of
//! truth: every failure on either side (missing file, I/O error, malformed
//! record) degrades to an empty result instead of propagating.

use flacbox_common::model::Track;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Flat-file library cache
pub struct LibraryCache {
    path: PathBuf,
}

impl LibraryCache {
    /// Cache backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write the track list, best-effort
    pub fn save(&self, tracks: &[Track]) {
        let json = match serde_json::to_vec(tracks) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to encode library cache: {}", e);
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("failed to create cache directory {:?}: {}", parent, e);
                return;
            }
        }
        match std::fs::write(&self.path, json) {
            Ok(()) => debug!("cached {} tracks to {:?}", tracks.len(), self.path),
            Err(e) => warn!("failed to write library cache {:?}: {}", self.path, e),
        }
    }

    /// Read the track list back; any failure yields an empty list
    pub fn load(&self) -> Vec<Track> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("no library cache at {:?}: {}", self.path, e);
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!("corrupt library cache {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }
}
