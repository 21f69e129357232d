//! Preferences file handling
//!
//! A small TOML file in the platform config directory holding the saved
//! library root identifier and the favorites set. Loading is best-effort:
//! a missing or corrupt file degrades to defaults. Writes report failure to
//! the caller but callers are free to treat persistence as advisory.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

/// On-disk preference contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefsData {
    /// Last-selected library root identifier (document store node)
    pub library_root: Option<String>,
    /// Favorite track identities
    #[serde(default)]
    pub favorites: BTreeSet<String>,
}

/// Preferences store backed by a TOML file
///
/// Thread-safe; every setter persists immediately.
pub struct Preferences {
    path: PathBuf,
    data: RwLock<PrefsData>,
}

impl Preferences {
    /// Open preferences at the given path, loading existing contents
    ///
    /// A missing or unparseable file yields defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = Self::load(&path);
        Self {
            path,
            data: RwLock::new(data),
        }
    }

    /// Default preferences path for the platform
    ///
    /// `~/.config/flacbox/prefs.toml` on Linux, the platform equivalent
    /// elsewhere, falling back to the working directory when no config
    /// directory can be determined.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("flacbox").join("prefs.toml"))
            .unwrap_or_else(|| PathBuf::from("flacbox-prefs.toml"))
    }

    fn load(path: &Path) -> PrefsData {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                debug!("no preferences file at {:?}: {}", path, e);
                return PrefsData::default();
            }
        };
        match toml::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                warn!("corrupt preferences file {:?}: {}", path, e);
                PrefsData::default()
            }
        }
    }

    /// Saved library root identifier, if any
    pub fn library_root(&self) -> Option<String> {
        self.read().library_root.clone()
    }

    /// Persist the library root identifier
    pub fn set_library_root(&self, root: &str) -> Result<()> {
        let snapshot = {
            let mut data = self.write();
            data.library_root = Some(root.to_string());
            data.clone()
        };
        self.persist(&snapshot)
    }

    /// Current favorites set
    pub fn favorites(&self) -> BTreeSet<String> {
        self.read().favorites.clone()
    }

    /// Persist the favorites set
    pub fn set_favorites(&self, favorites: BTreeSet<String>) -> Result<()> {
        let snapshot = {
            let mut data = self.write();
            data.favorites = favorites;
            data.clone()
        };
        self.persist(&snapshot)
    }

    fn persist(&self, data: &PrefsData) -> Result<()> {
        let text = toml::to_string_pretty(data).map_err(|e| Error::Prefs(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, PrefsData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, PrefsData> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
