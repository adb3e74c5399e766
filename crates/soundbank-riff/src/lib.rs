//! RIFF container walking for Soundbank.
//!
//! A RIFF file is a sequence of tagged chunks: a four-character code, a
//! 32-bit payload length, the payload, and one pad byte when the payload
//! length is odd. `RIFF` and `LIST` chunks start their payload with a
//! second four-character code (the form type) followed by nested chunks.
//!
//! This crate knows nothing about what the chunks mean. It provides:
//!
//! - **[`ChunkReader`]** / [`parse`] - Walk a byte window and produce [`Chunk`] descriptors
//! - **[`ChunkReaderConfig`]** - Size-field endianness and pad-byte handling
//! - **[`FourCc`]** - Opaque four-byte chunk identifiers
//! - **[`RecordCursor`]** - Little-endian reader for fixed-width records inside a payload
//!
//! # Example
//!
//! ```ignore
//! use soundbank_riff::{parse, ChunkReaderConfig, FourCc};
//!
//! let chunks = parse(&bytes, 0, bytes.len(), ChunkReaderConfig::default())?;
//! let riff = &chunks[0];
//! assert_eq!(riff.tag, FourCc::RIFF);
//! let form = riff.form_type(&bytes)?;
//! let children = riff.children(&bytes, ChunkReaderConfig::default())?;
//! ```

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::{ChunkReaderConfig, Endian};

mod fourcc;
pub use fourcc::FourCc;

mod chunk;
pub use chunk::{parse, Chunk, ChunkReader, CHUNK_HEADER_SIZE};

mod cursor;
pub use cursor::RecordCursor;
