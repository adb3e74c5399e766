//! Error types for soundbank-riff.

use crate::FourCc;
use thiserror::Error;

/// Result type alias for chunk reading.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while walking a RIFF byte window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Fewer bytes remain than a header or field needs.
    #[error("Unexpected end of data at offset {offset}: need {needed} bytes, {remaining} remain")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A chunk declares a payload running past the end of the buffer.
    #[error("Truncated chunk '{tag}' at offset {offset}: declares {size} bytes, {available} available")]
    TruncatedChunk {
        tag: FourCc,
        offset: usize,
        size: u32,
        available: usize,
    },

    /// The requested scan window does not lie inside the buffer.
    #[error("Scan window {start}..{start}+{length} is outside a {buffer_len}-byte buffer")]
    RangeOutOfBounds {
        start: usize,
        length: usize,
        buffer_len: usize,
    },

    /// A `RIFF`/`LIST` payload is too short to hold its form type.
    #[error("Chunk '{tag}' has {size} payload bytes, too few for a form type")]
    MissingFormType { tag: FourCc, size: u32 },
}
