//! Library coordination
//!
//! Owns the scanner, cache, preferences, and favorites; publishes the track
//! list, the derived album list, and the scanning flag as last-write-wins
//! observable cells. Scan work runs off the interactive context via
//! `spawn_blocking`; the published track list is only ever replaced
//! wholesale, so no observer sees a partially built list.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flacbox_common::model::{Album, Track};
use flacbox_common::prefs::Preferences;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::LibraryCache;
use crate::favorites::FavoritesStore;
use crate::index;
use crate::meta::MetadataExtractor;
use crate::scanner;
use crate::store::DocumentStore;

/// Coordinates scanning, caching, and the observable library views
pub struct LibraryManager {
    store: Arc<dyn DocumentStore>,
    extractor: Arc<dyn MetadataExtractor>,
    prefs: Arc<Preferences>,
    favorites: FavoritesStore,
    cache: LibraryCache,

    tracks_tx: watch::Sender<Arc<Vec<Track>>>,
    albums_tx: watch::Sender<Arc<Vec<Album>>>,
    scanning_tx: watch::Sender<bool>,

    /// Token of the most recently requested scan. Results arriving under a
    /// stale token are discarded: a superseded scan never overwrites a newer
    /// one's result.
    scan_generation: Mutex<Uuid>,

    /// Scans currently in flight; the scanning flag clears when this drains
    active_scans: AtomicUsize,
}

impl LibraryManager {
    /// Build a manager over the given store, extractor, preferences, and cache
    pub fn new(
        store: Arc<dyn DocumentStore>,
        extractor: Arc<dyn MetadataExtractor>,
        prefs: Arc<Preferences>,
        cache: LibraryCache,
    ) -> Self {
        let (tracks_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (albums_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (scanning_tx, _) = watch::channel(false);
        Self {
            favorites: FavoritesStore::new(Arc::clone(&prefs)),
            store,
            extractor,
            prefs,
            cache,
            tracks_tx,
            albums_tx,
            scanning_tx,
            scan_generation: Mutex::new(Uuid::new_v4()),
            active_scans: AtomicUsize::new(0),
        }
    }

    /// Persist the library root identifier for later sessions
    pub fn set_library_root(&self, root: &str) {
        if let Err(e) = self.prefs.set_library_root(root) {
            warn!("failed to persist library root: {}", e);
        }
    }

    /// Saved library root identifier, if any
    pub fn library_root(&self) -> Option<String> {
        self.prefs.library_root()
    }

    /// Cold-start entry point: publish the cached library when present,
    /// otherwise run one scan. No-op without a saved root.
    pub async fn load_saved_and_scan(&self) {
        if self.prefs.library_root().is_none() {
            return;
        }

        let cached = self.cache.load();
        if !cached.is_empty() {
            info!("loaded {} tracks from library cache", cached.len());
            self.publish(cached);
            return;
        }

        self.rescan().await;
    }

    /// Walk the saved root and replace the published library with the result.
    ///
    /// No-op without a saved root. Concurrent rescans are not serialized;
    /// each takes a fresh generation token and only the most recently
    /// requested scan gets to publish (and cache) its result.
    pub async fn rescan(&self) {
        let Some(root) = self.prefs.library_root() else {
            return;
        };

        let generation = Uuid::new_v4();
        *self.scan_generation.lock().await = generation;

        self.active_scans.fetch_add(1, Ordering::SeqCst);
        self.scanning_tx.send_replace(true);

        let store = Arc::clone(&self.store);
        let extractor = Arc::clone(&self.extractor);
        let result = tokio::task::spawn_blocking(move || {
            scanner::scan_tree(store.as_ref(), extractor.as_ref(), &root)
        })
        .await;

        match result {
            Ok(tracks) => {
                if *self.scan_generation.lock().await == generation {
                    self.cache.save(&tracks);
                    self.publish(tracks);
                } else {
                    info!("discarding superseded scan result ({} tracks)", tracks.len());
                }
            }
            Err(e) => warn!("scan task failed: {}", e),
        }

        if self.active_scans.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.scanning_tx.send_replace(false);
        }
    }

    fn publish(&self, tracks: Vec<Track>) {
        // Derived view recomputed on every track-list change
        self.albums_tx.send_replace(Arc::new(index::albums(&tracks)));
        self.tracks_tx.send_replace(Arc::new(tracks));
    }

    /// Observe the track list
    pub fn subscribe_tracks(&self) -> watch::Receiver<Arc<Vec<Track>>> {
        self.tracks_tx.subscribe()
    }

    /// Observe the derived album list
    pub fn subscribe_albums(&self) -> watch::Receiver<Arc<Vec<Album>>> {
        self.albums_tx.subscribe()
    }

    /// Observe the scan-in-progress flag
    pub fn subscribe_scanning(&self) -> watch::Receiver<bool> {
        self.scanning_tx.subscribe()
    }

    /// Current track list
    pub fn tracks(&self) -> Arc<Vec<Track>> {
        self.tracks_tx.borrow().clone()
    }

    /// Current derived album list
    pub fn albums(&self) -> Arc<Vec<Album>> {
        self.albums_tx.borrow().clone()
    }

    /// Whether a scan is currently in flight
    pub fn is_scanning(&self) -> bool {
        *self.scanning_tx.borrow()
    }

    /// Ordered track listing for one album
    pub fn album_tracks(&self, key: &str) -> Vec<Track> {
        index::album_tracks(&self.tracks(), key)
    }

    /// Favorited tracks across the library
    pub fn favorites_only(&self) -> Vec<Track> {
        index::favorites_only(&self.tracks(), &self.favorites.favorites())
    }

    /// Flip favorite membership for a track identity
    pub fn toggle_favorite(&self, uri: &str) {
        self.favorites.toggle(uri);
    }

    /// Whether a track identity is favorited
    pub fn is_favorite(&self, uri: &str) -> bool {
        self.favorites.is_favorite(uri)
    }
}
