//! Common error types for flacbox

use thiserror::Error;

/// Common result type for flacbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the flacbox crates
///
/// The indexing pipeline and the playback session absorb their own faults;
/// this type only surfaces from the preferences layer, where the host may
/// want to know that a setting did not persist.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Preferences encoding error
    #[error("Preferences error: {0}")]
    Prefs(String),
}
