//! Error and warning types for soundbank-sf2.

use soundbank_riff::FourCc;
use thiserror::Error;

/// Result type alias for SoundFont decoding.
pub type Result<T> = std::result::Result<T, Error>;

/// Structural failures. Any of these aborts the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Chunk walking failed (truncation, short header, bad window).
    #[error("RIFF error: {0}")]
    Riff(#[from] soundbank_riff::Error),

    /// A chunk or form type does not match the fixed SoundFont layout.
    #[error("Unexpected chunk in {context}: expected '{expected}', found '{found}'")]
    UnexpectedChunkTag {
        context: &'static str,
        expected: FourCc,
        found: FourCc,
    },

    /// A list holds a different number of sub-chunks than the format mandates.
    #[error("Unexpected chunk count in {context}: expected {expected}, found {found}")]
    UnexpectedChunkCount {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A record chunk's size is not a whole number of records.
    #[error("Chunk '{tag}' is {size} bytes, not a multiple of its {record_size}-byte record")]
    InvalidRecordSize {
        tag: FourCc,
        size: u32,
        record_size: usize,
    },
}

/// Non-fatal problems recovered from during a load.
///
/// Each warning is also emitted as a `tracing` event when it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// An instrument zone's `sampleID` points outside the sample headers.
    #[error("Instrument {instrument} zone {zone} references sample {sample_id}, only {sample_count} exist")]
    MissingSampleReference {
        instrument: usize,
        zone: usize,
        sample_id: u16,
        sample_count: usize,
    },

    /// A preset zone's `instrument` points outside the instrument headers.
    #[error("Preset {bank}:{preset} references instrument {instrument}, only {instrument_count} exist")]
    MissingInstrumentReference {
        bank: u16,
        preset: u16,
        instrument: u16,
        instrument_count: usize,
    },

    /// A header or bag index range is decreasing or runs past its array.
    #[error("{list} entry {index} has index range {start}..{end} over {total} records")]
    InvalidBagRange {
        list: &'static str,
        index: usize,
        start: usize,
        end: usize,
        total: usize,
    },

    /// A sample header points outside the `smpl` data; the slice was clamped.
    #[error("Sample {sample} spans frames {start}..{end}, only {available} available")]
    SampleOutOfBounds {
        sample: usize,
        start: u32,
        end: u32,
        available: usize,
    },

    /// A sample declares a rate of 0 Hz; it is kept without rate normalization.
    #[error("Sample {sample} declares a sample rate of 0")]
    ZeroSampleRate { sample: usize },

    /// A record array is empty, so it has no terminal sentinel.
    #[error("Chunk '{tag}' has no terminal record")]
    MissingTerminalRecord { tag: FourCc },
}
