//! Media engine surface
//!
//! The audio decode/render engine is an external capability. The playback
//! session drives it through this trait and reacts to its event stream; it
//! never re-interprets engine-level faults (a missing or undecodable file
//! surfaces as the engine's own skip/stop behavior).

use flacbox_common::events::EngineEvent;
use tokio::sync::broadcast;

/// Transport surface of an audio engine
///
/// Implementations hold their own queue mirror and current index; the session
/// only duplicates queue membership for display lookups.
pub trait MediaEngine: Send + Sync {
    /// Replace the engine's queue with the given playable URIs
    fn load_queue(&self, uris: &[String]);

    /// Move to the given queue index at the given position
    fn seek_to_item(&self, index: usize, position_ms: u64);

    /// Begin or resume playback
    fn play(&self);

    /// Pause playback
    fn pause(&self);

    /// Skip to the next queue item
    fn skip_next(&self);

    /// Skip to the previous queue item
    fn skip_previous(&self);

    /// Whether a next queue item exists
    fn has_next(&self) -> bool;

    /// Whether a previous queue item exists
    fn has_previous(&self) -> bool;

    /// Index of the current queue item
    fn current_index(&self) -> usize;

    /// Current position within the current item, milliseconds
    fn position_ms(&self) -> u64;

    /// Duration of the current item, milliseconds (0 when unknown)
    fn duration_ms(&self) -> u64;

    /// Whether the engine is currently playing
    fn is_playing(&self) -> bool;

    /// Subscribe to the engine's transport events
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;
}
