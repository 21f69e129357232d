//! Engine event types and EventBus
//!
//! The media engine reports transport state through these events; the
//! playback session subscribes and reacts (poll-loop lifecycle, artwork
//! invalidation, snapshot pushes).

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Transport events emitted by a media engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// Playing state flipped (play, pause, end-of-queue, engine error)
    ///
    /// Triggers:
    /// - Session: start/stop the position poll loop
    /// - Session: full snapshot push
    PlayingChanged {
        /// Playing state after the change
        is_playing: bool,
        /// When the state changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Current queue item changed (skip, natural advance, queue load)
    ///
    /// Triggers:
    /// - Session: unconditional artwork cache invalidation
    /// - Session: full snapshot push
    TrackTransitioned {
        /// Queue index of the new current item
        index: usize,
        /// When the transition happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Any other engine-internal state change worth re-reading
    ///
    /// Triggers:
    /// - Session: full snapshot push
    StateChanged {
        /// When the state changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Central event distribution bus for engine events
///
/// Wraps tokio::broadcast, providing:
/// - Non-blocking publish (slow subscribers don't block the engine)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Send errors are ignored: having no subscribers is not a fault.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
