//! Document store abstraction
//!
//! Hierarchical, permission-scoped storage surface the scanner walks. Node
//! identifiers are opaque strings that double as stable track identities.
//! Listing an unreadable directory degrades to an empty child list; open
//! failures are reported to the caller so that entries a provider lists but
//! cannot actually serve get skipped.

use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

/// Readable, seekable handle to a stored document
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Hierarchical document storage
///
/// Implementations must be shareable across the scanner's blocking task and
/// the playback session's artwork reads.
pub trait DocumentStore: Send + Sync {
    /// Children of a container node; unreadable directories yield an empty list
    fn list_children(&self, node: &str) -> Vec<String>;

    /// Whether the node is a container (directory)
    fn is_container(&self, node: &str) -> bool;

    /// Display name of the node, if the provider reports one
    fn name(&self, node: &str) -> Option<String>;

    /// Open the node for reading
    ///
    /// Some providers list entries they cannot serve; callers probe with this
    /// before committing to metadata extraction.
    fn open_for_read(&self, node: &str) -> std::io::Result<Box<dyn ReadSeek>>;

    /// Stable identity usable as `Track::uri`
    fn identity(&self, node: &str) -> String {
        node.to_string()
    }
}

/// Document store over the local filesystem
///
/// Nodes are path strings; identity is the path itself.
#[derive(Debug, Default)]
pub struct FsDocumentStore;

impl FsDocumentStore {
    /// Create a filesystem-backed document store
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStore for FsDocumentStore {
    fn list_children(&self, node: &str) -> Vec<String> {
        let entries = match std::fs::read_dir(node) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("unreadable directory {}: {}", node, e);
                return Vec::new();
            }
        };
        entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path().to_string_lossy().into_owned()),
                Err(e) => {
                    debug!("unreadable entry under {}: {}", node, e);
                    None
                }
            })
            .collect()
    }

    fn is_container(&self, node: &str) -> bool {
        Path::new(node).is_dir()
    }

    fn name(&self, node: &str) -> Option<String> {
        Path::new(node)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }

    fn open_for_read(&self, node: &str) -> std::io::Result<Box<dyn ReadSeek>> {
        let file = std::fs::File::open(node)?;
        Ok(Box::new(file))
    }
}
