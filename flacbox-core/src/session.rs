//! Shared playback session
//!
//! Single long-lived state machine owning the playback queue, the transport
//! operations, the conditional position poll loop, the single-slot artwork
//! cache, and the NowPlaying broadcast. Built once at the host's composition
//! root and shared by every observer (UI screens, notification surface);
//! it outlives any one of them.
//!
//! Snapshot pushes come in two modes:
//! - "fast" (poll loop, seek): position/duration/play-state only, artwork
//!   reused from the cache slot without touching the store
//! - "full" (play/pause toggle, track transition, engine state change):
//!   re-evaluates artwork through the single-slot cache

use std::sync::Arc;
use std::time::Duration;

use flacbox_common::events::EngineEvent;
use flacbox_common::model::{NowPlaying, Track};
use tokio::sync::{broadcast, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::MediaEngine;
use crate::meta::MetadataExtractor;
use crate::store::DocumentStore;

/// Position poll interval while playing. Responsive in the UI without
/// incurring extra decode work (fast pushes reuse cached artwork).
const POSITION_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Single-slot artwork memoization keyed by the current track's identity.
///
/// Only the currently playing track's art is ever displayed, so this is a
/// (key, value) pair invalidated on key mismatch, not a general cache. A
/// stored `None` is a valid entry: a track known to carry no artwork is not
/// re-decoded on every push.
#[derive(Default)]
struct ArtSlot {
    uri: Option<String>,
    bytes: Option<Arc<Vec<u8>>>,
}

struct SessionInner {
    engine: Arc<dyn MediaEngine>,
    store: Arc<dyn DocumentStore>,
    extractor: Arc<dyn MetadataExtractor>,

    /// Current queue, replaced wholesale by `play_queue`. The engine tracks
    /// the current index; this copy exists for display lookups only.
    queue: RwLock<Vec<Track>>,

    /// Last-write-wins NowPlaying broadcast
    now_playing_tx: watch::Sender<NowPlaying>,

    art: Mutex<ArtSlot>,

    /// At most one poll loop per session
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

/// The shared playback session
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct PlaybackSession {
    inner: Arc<SessionInner>,
}

impl PlaybackSession {
    /// Create the session and start its engine event pump.
    ///
    /// Must be called within a tokio runtime; the pump task lives until the
    /// engine's event stream closes.
    pub fn new(
        engine: Arc<dyn MediaEngine>,
        store: Arc<dyn DocumentStore>,
        extractor: Arc<dyn MetadataExtractor>,
    ) -> Self {
        let (now_playing_tx, _) = watch::channel(NowPlaying::default());
        // Subscribe before spawning so no event emitted after construction
        // can slip past the pump.
        let events = engine.subscribe();
        let inner = Arc::new(SessionInner {
            engine,
            store,
            extractor,
            queue: RwLock::new(Vec::new()),
            now_playing_tx,
            art: Mutex::new(ArtSlot::default()),
            poll_task: Mutex::new(None),
        });

        let pump = Arc::clone(&inner);
        tokio::spawn(pump_events(pump, events));

        Self { inner }
    }

    /// Replace the queue wholesale and start playing at `start_uri`.
    ///
    /// Falls back to index 0 when `start_uri` is not in the new queue.
    pub async fn play_queue(&self, tracks: Vec<Track>, start_uri: &str) {
        let start_index = tracks
            .iter()
            .position(|t| t.uri == start_uri)
            .unwrap_or(0);
        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();

        info!(
            "loading queue of {} tracks, starting at index {}",
            tracks.len(),
            start_index
        );
        *self.inner.queue.write().await = tracks;

        self.inner.engine.load_queue(&uris);
        self.inner.engine.seek_to_item(start_index, 0);
        self.inner.engine.play();

        self.inner.push_state(false).await;
    }

    /// Flip play/pause. Defensive no-op when no queue is loaded.
    pub async fn toggle_play_pause(&self) {
        if self.inner.queue.read().await.is_empty() {
            return;
        }
        if self.inner.engine.is_playing() {
            self.inner.engine.pause();
        } else {
            self.inner.engine.play();
        }
        self.inner.push_state(false).await;
    }

    /// Skip to the next queue item, if one exists.
    pub fn next(&self) {
        if self.inner.engine.has_next() {
            self.inner.engine.skip_next();
        }
    }

    /// Skip to the previous queue item, if one exists.
    pub fn prev(&self) {
        if self.inner.engine.has_previous() {
            self.inner.engine.skip_previous();
        }
    }

    /// Seek within the current item.
    ///
    /// Pushes a fast snapshot immediately so the UI reflects the seek without
    /// waiting for the next poll tick. No-op when no queue is loaded.
    pub async fn seek_to(&self, position_ms: u64) {
        if self.inner.queue.read().await.is_empty() {
            return;
        }
        let index = self.inner.engine.current_index();
        self.inner.engine.seek_to_item(index, position_ms);
        self.inner.push_state(true).await;
    }

    /// Current NowPlaying snapshot
    pub fn now_playing(&self) -> NowPlaying {
        self.inner.now_playing_tx.borrow().clone()
    }

    /// Subscribe to NowPlaying snapshots (last-write-wins; intermediate
    /// snapshots may be missed, observers only need the current one)
    pub fn subscribe(&self) -> watch::Receiver<NowPlaying> {
        self.inner.now_playing_tx.subscribe()
    }

    /// Current queue contents
    pub async fn queue(&self) -> Vec<Track> {
        self.inner.queue.read().await.clone()
    }

    /// Whether the position poll loop is currently running
    pub async fn position_poll_active(&self) -> bool {
        self.inner
            .poll_task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl SessionInner {
    /// Publish a NowPlaying snapshot.
    ///
    /// `fast` reuses the last known artwork; a full push re-evaluates it
    /// through the single-slot cache.
    async fn push_state(&self, fast: bool) {
        let queue = self.queue.read().await;
        let current = queue.get(self.engine.current_index()).cloned();
        let has_queue = queue.len() > 1;
        drop(queue);

        let duration_ms = self.engine.duration_ms();
        let mut position_ms = self.engine.position_ms();
        if duration_ms > 0 {
            // Clamp for display
            position_ms = position_ms.min(duration_ms);
        }

        let album_art = match (&current, fast) {
            (Some(track), false) => self.art_for(&track.uri).await,
            _ => self.cached_art().await,
        };

        let snapshot = NowPlaying {
            title: current.as_ref().map(|t| t.title.clone()).unwrap_or_default(),
            artist: current.as_ref().map(|t| t.artist.clone()).unwrap_or_default(),
            album: current.as_ref().map(|t| t.album.clone()).unwrap_or_default(),
            uri: current.map(|t| t.uri),
            is_playing: self.engine.is_playing(),
            position_ms,
            duration_ms,
            album_art,
            has_queue,
        };
        self.now_playing_tx.send_replace(snapshot);
    }

    /// Artwork for the given track, memoized in the single slot.
    ///
    /// A key match returns the stored bytes without touching the store; a
    /// mismatch performs one scoped open-and-extract, with failure and
    /// absence both stored as `None`.
    async fn art_for(&self, uri: &str) -> Option<Arc<Vec<u8>>> {
        let mut slot = self.art.lock().await;
        if slot.uri.as_deref() == Some(uri) {
            return slot.bytes.clone();
        }

        let bytes = match self.store.open_for_read(uri) {
            Ok(handle) => self.extractor.extract_art(handle).map(Arc::new),
            Err(e) => {
                debug!("cannot open {} for artwork: {}", uri, e);
                None
            }
        };
        slot.uri = Some(uri.to_string());
        slot.bytes = bytes.clone();
        bytes
    }

    async fn cached_art(&self) -> Option<Arc<Vec<u8>>> {
        self.art.lock().await.bytes.clone()
    }

    /// New track means the old artwork is stale, unconditionally.
    async fn invalidate_art(&self) {
        *self.art.lock().await = ArtSlot::default();
    }

    async fn stop_position_updates(&self) {
        if let Some(task) = self.poll_task.lock().await.take() {
            task.abort();
            debug!("position poll loop stopped");
        }
    }
}

/// Start the position poll loop; no-op when one is already running.
async fn start_position_updates(inner: &Arc<SessionInner>) {
    let mut slot = inner.poll_task.lock().await;
    if slot.as_ref().is_some_and(|task| !task.is_finished()) {
        return;
    }

    let session = Arc::clone(inner);
    *slot = Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(POSITION_POLL_INTERVAL);
        loop {
            ticker.tick().await;
            session.push_state(true).await;
        }
    }));
    debug!("position poll loop started");
}

/// React to the engine's transport events for the life of the session.
async fn pump_events(
    inner: Arc<SessionInner>,
    mut events: broadcast::Receiver<EngineEvent>,
) {
    loop {
        match events.recv().await {
            Ok(EngineEvent::PlayingChanged { is_playing, .. }) => {
                if is_playing {
                    start_position_updates(&inner).await;
                } else {
                    inner.stop_position_updates().await;
                }
                inner.push_state(false).await;
            }
            Ok(EngineEvent::TrackTransitioned { index, .. }) => {
                debug!("track transition to index {}", index);
                inner.invalidate_art().await;
                inner.push_state(false).await;
            }
            Ok(EngineEvent::StateChanged { .. }) => {
                inner.push_state(false).await;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("engine event stream lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    // Engine gone; the poll loop must not outlive it.
    inner.stop_position_updates().await;
}
