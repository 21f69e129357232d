//! Controllable media engine for session tests

use flacbox_common::events::{EngineEvent, EventBus};
use flacbox_core::engine::MediaEngine;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;

#[derive(Default)]
struct EngineState {
    uris: Vec<String>,
    index: usize,
    position_ms: u64,
    duration_ms: u64,
    playing: bool,
}

/// Media engine whose transport state the test drives directly.
///
/// State changes emit the same events a real engine would, which exercises
/// the session's event pump end to end.
pub struct FakeEngine {
    state: Mutex<EngineState>,
    events: EventBus,
    skip_calls: AtomicUsize,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            events: EventBus::new(64),
            skip_calls: AtomicUsize::new(0),
        }
    }

    /// Number of skip_next/skip_previous calls that reached the engine
    pub fn skip_call_count(&self) -> usize {
        self.skip_calls.load(Ordering::SeqCst)
    }

    /// Advance the playhead without emitting anything, like a decoder would
    pub fn set_position(&self, position_ms: u64) {
        self.state.lock().unwrap().position_ms = position_ms;
    }

    /// Set the reported duration of the current item
    pub fn set_duration(&self, duration_ms: u64) {
        self.state.lock().unwrap().duration_ms = duration_ms;
    }

    /// Emit a raw playing-changed event regardless of current state,
    /// for duplicate-event scenarios
    pub fn emit_playing(&self, is_playing: bool) {
        self.events.emit(EngineEvent::PlayingChanged {
            is_playing,
            timestamp: chrono::Utc::now(),
        });
    }

    fn emit_transition(&self, index: usize) {
        self.events.emit(EngineEvent::TrackTransitioned {
            index,
            timestamp: chrono::Utc::now(),
        });
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaEngine for FakeEngine {
    fn load_queue(&self, uris: &[String]) {
        let mut state = self.state.lock().unwrap();
        state.uris = uris.to_vec();
        state.index = 0;
        state.position_ms = 0;
    }

    fn seek_to_item(&self, index: usize, position_ms: u64) {
        let transition = {
            let mut state = self.state.lock().unwrap();
            let clamped = index.min(state.uris.len().saturating_sub(1));
            let changed = clamped != state.index;
            state.index = clamped;
            state.position_ms = position_ms;
            changed.then_some(clamped)
        };
        if let Some(index) = transition {
            self.emit_transition(index);
        }
    }

    fn play(&self) {
        let changed = {
            let mut state = self.state.lock().unwrap();
            let changed = !state.playing;
            state.playing = true;
            changed
        };
        if changed {
            self.emit_playing(true);
        }
    }

    fn pause(&self) {
        let changed = {
            let mut state = self.state.lock().unwrap();
            let changed = state.playing;
            state.playing = false;
            changed
        };
        if changed {
            self.emit_playing(false);
        }
    }

    fn skip_next(&self) {
        self.skip_calls.fetch_add(1, Ordering::SeqCst);
        let transition = {
            let mut state = self.state.lock().unwrap();
            if state.index + 1 < state.uris.len() {
                state.index += 1;
                state.position_ms = 0;
                Some(state.index)
            } else {
                None
            }
        };
        if let Some(index) = transition {
            self.emit_transition(index);
        }
    }

    fn skip_previous(&self) {
        self.skip_calls.fetch_add(1, Ordering::SeqCst);
        let transition = {
            let mut state = self.state.lock().unwrap();
            if state.index > 0 {
                state.index -= 1;
                state.position_ms = 0;
                Some(state.index)
            } else {
                None
            }
        };
        if let Some(index) = transition {
            self.emit_transition(index);
        }
    }

    fn has_next(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.index + 1 < state.uris.len()
    }

    fn has_previous(&self) -> bool {
        self.state.lock().unwrap().index > 0
    }

    fn current_index(&self) -> usize {
        self.state.lock().unwrap().index
    }

    fn position_ms(&self) -> u64 {
        self.state.lock().unwrap().position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.state.lock().unwrap().duration_ms
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }
}
