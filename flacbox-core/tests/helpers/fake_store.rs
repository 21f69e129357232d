//! Scripted in-memory document store and metadata extractor

use flacbox_core::meta::{MetadataExtractor, TrackMeta};
use flacbox_core::store::{DocumentStore, ReadSeek};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

enum FakeNode {
    Dir {
        name: Option<String>,
        children: Vec<String>,
    },
    File {
        name: Option<String>,
        data: Vec<u8>,
        openable: bool,
    },
}

/// In-memory document tree with scripted failure modes
///
/// Node ids are arbitrary strings chosen by the test. Optional per-listing
/// latency makes in-flight scans observable from the outside.
#[derive(Default)]
pub struct FakeStore {
    nodes: RwLock<HashMap<String, FakeNode>>,
    list_latency: Mutex<Duration>,
    opens: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory with the given child ids
    pub fn dir(&self, id: &str, name: &str, children: &[&str]) {
        self.insert(
            id,
            FakeNode::Dir {
                name: Some(name.to_string()),
                children: children.iter().map(|c| c.to_string()).collect(),
            },
        );
    }

    /// Register a readable file
    pub fn file(&self, id: &str, name: &str, data: Vec<u8>) {
        self.insert(
            id,
            FakeNode::File {
                name: Some(name.to_string()),
                data,
                openable: true,
            },
        );
    }

    /// Register a file the provider lists but cannot serve
    pub fn locked_file(&self, id: &str, name: &str) {
        self.insert(
            id,
            FakeNode::File {
                name: Some(name.to_string()),
                data: Vec::new(),
                openable: false,
            },
        );
    }

    /// Register a file the provider reports without a name
    pub fn nameless_file(&self, id: &str) {
        self.insert(
            id,
            FakeNode::File {
                name: None,
                data: Vec::new(),
                openable: true,
            },
        );
    }

    /// Sleep this long inside every `list_children` call
    pub fn set_list_latency(&self, latency: Duration) {
        *self.list_latency.lock().unwrap() = latency;
    }

    /// Number of `open_for_read` calls so far
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn insert(&self, id: &str, node: FakeNode) {
        self.nodes.write().unwrap().insert(id.to_string(), node);
    }
}

impl DocumentStore for FakeStore {
    fn list_children(&self, node: &str) -> Vec<String> {
        let latency = *self.list_latency.lock().unwrap();
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }
        match self.nodes.read().unwrap().get(node) {
            Some(FakeNode::Dir { children, .. }) => children.clone(),
            _ => Vec::new(),
        }
    }

    fn is_container(&self, node: &str) -> bool {
        matches!(self.nodes.read().unwrap().get(node), Some(FakeNode::Dir { .. }))
    }

    fn name(&self, node: &str) -> Option<String> {
        match self.nodes.read().unwrap().get(node) {
            Some(FakeNode::Dir { name, .. }) => name.clone(),
            Some(FakeNode::File { name, .. }) => name.clone(),
            None => None,
        }
    }

    fn open_for_read(&self, node: &str) -> std::io::Result<Box<dyn ReadSeek>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        match self.nodes.read().unwrap().get(node) {
            Some(FakeNode::File { data, openable: true, .. }) => {
                Ok(Box::new(Cursor::new(data.clone())))
            }
            Some(FakeNode::File { openable: false, .. }) => Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "provider listed an unservable document",
            )),
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such node",
            )),
        }
    }
}

/// Build scripted file bytes for [`FakeExtractor`]
///
/// `meta_bytes(&[("title", "Song"), ("artist", "Band")])`
pub fn meta_bytes(fields: &[(&str, &str)]) -> Vec<u8> {
    let mut out = String::from("#meta\n");
    for (key, value) in fields {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out.into_bytes()
}

/// Metadata extractor reading the scripted `#meta` line format
///
/// Files without the marker yield an all-`None` result, standing in for
/// untagged or unparseable audio. Artwork decodes are counted so tests can
/// assert on the single-slot memoization.
#[derive(Default)]
pub struct FakeExtractor {
    art_decodes: AtomicUsize,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `extract_art` calls so far
    pub fn art_decode_count(&self) -> usize {
        self.art_decodes.load(Ordering::SeqCst)
    }

    fn fields(mut handle: Box<dyn ReadSeek>) -> HashMap<String, String> {
        let mut text = String::new();
        if handle.read_to_string(&mut text).is_err() {
            return HashMap::new();
        }
        let Some(body) = text.strip_prefix("#meta\n") else {
            return HashMap::new();
        };
        body.lines()
            .filter_map(|line| {
                line.split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
            })
            .collect()
    }
}

impl MetadataExtractor for FakeExtractor {
    fn extract(&self, handle: Box<dyn ReadSeek>) -> TrackMeta {
        let fields = Self::fields(handle);
        TrackMeta {
            title: fields.get("title").cloned(),
            artist: fields.get("artist").cloned(),
            album: fields.get("album").cloned(),
            duration_ms: fields.get("duration").and_then(|v| v.parse().ok()),
            track_number: fields.get("track").and_then(|v| v.parse().ok()),
            disc_number: fields.get("disc").and_then(|v| v.parse().ok()),
        }
    }

    fn extract_art(&self, handle: Box<dyn ReadSeek>) -> Option<Vec<u8>> {
        self.art_decodes.fetch_add(1, Ordering::SeqCst);
        Self::fields(handle)
            .get("art")
            .map(|v| v.clone().into_bytes())
    }
}
