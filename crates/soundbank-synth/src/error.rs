//! Error types for soundbank-synth.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for soundbank-synth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or swapping banks.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural decode failure of an in-memory buffer.
    #[error("SoundFont error: {0}")]
    Decode(#[from] soundbank_sf2::Error),

    /// Structural decode failure of a file on disk.
    #[error("Failed to parse SoundFont file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: soundbank_sf2::Error,
    },

    /// Handle does not name a loaded bank.
    #[error("Unknown sound bank handle {0}")]
    UnknownHandle(usize),
}
