//! # Flacbox Core
//!
//! Library indexing pipeline and shared playback session for a folder-based
//! FLAC library:
//! - Document store abstraction and filesystem adapter
//! - Recursive library scanner with per-file fault isolation
//! - JSON library cache (cold-start optimization)
//! - Deterministic album grouping and sorting
//! - Favorites store
//! - Playback session state machine with conditional position polling,
//!   single-slot artwork memoization, and NowPlaying broadcast
//!
//! The audio decode/render engine is consumed through the [`engine::MediaEngine`]
//! trait; presentation and OS notification surfaces subscribe to the observable
//! state published here.

pub mod cache;
pub mod engine;
pub mod favorites;
pub mod index;
pub mod library;
pub mod meta;
pub mod scanner;
pub mod session;
pub mod store;

pub use library::LibraryManager;
pub use session::PlaybackSession;
