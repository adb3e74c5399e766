//! Centralized error type for the soundbank umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Riff(#[from] soundbank_riff::Error),

    #[error(transparent)]
    Decode(#[from] soundbank_sf2::Error),

    #[cfg(feature = "synth")]
    #[error(transparent)]
    Synth(#[from] soundbank_synth::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
