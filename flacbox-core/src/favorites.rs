//! Favorites store
//!
//! A persisted set of track identities with a symmetric toggle. Persistence
//! goes through the preferences layer and is best-effort: a failed write is
//! logged, the in-memory state stays consistent.

use flacbox_common::prefs::Preferences;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

/// Favorite track identities backed by the preferences file
pub struct FavoritesStore {
    prefs: Arc<Preferences>,
}

impl FavoritesStore {
    /// Favorites over the given preferences store
    pub fn new(prefs: Arc<Preferences>) -> Self {
        Self { prefs }
    }

    /// Current favorites set
    pub fn favorites(&self) -> BTreeSet<String> {
        self.prefs.favorites()
    }

    /// Whether the given track identity is favorited
    pub fn is_favorite(&self, uri: &str) -> bool {
        self.prefs.favorites().contains(uri)
    }

    /// Flip membership for the given track identity
    pub fn toggle(&self, uri: &str) {
        let mut set = self.prefs.favorites();
        if !set.insert(uri.to_string()) {
            set.remove(uri);
        }
        if let Err(e) = self.prefs.set_favorites(set) {
            warn!("failed to persist favorites: {}", e);
        }
    }
}
