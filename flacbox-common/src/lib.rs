//! # Flacbox Common Library
//!
//! Shared code for the flacbox playback core:
//! - Library and playback model types (Track, Album, NowPlaying)
//! - Engine event types (EngineEvent enum) and EventBus
//! - Preferences file handling
//! - Common error types

pub mod error;
pub mod events;
pub mod model;
pub mod prefs;

pub use error::{Error, Result};
