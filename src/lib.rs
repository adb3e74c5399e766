//! # Soundbank - SoundFont 2 decoder
//!
//! Reads a complete `.sf2` file and produces per-key playback parameters for a
//! sample-playback synthesizer.
//!
//! ## Architecture
//!
//! Soundbank is an umbrella crate that coordinates:
//! - **soundbank-riff** - RIFF chunk walking and fixed-width record cursor
//! - **soundbank-sf2** - Hydra decode, zone resolution, unit conversion, `BankSet`
//! - **soundbank-synth** - Bank cache by handle and the lock-free live bank slot
//!
//! ## Quick Start
//!
//! ```ignore
//! use soundbank::prelude::*;
//!
//! let bank = SoundBank::parse(&std::fs::read("gm.sf2")?)?;
//! let piano = bank.key(0, 0, 60).expect("middle C");
//! println!(
//!     "sample {} at {}x, {:.2}s attack",
//!     piano.sample_id, piano.base_playback_rate, piano.volume_envelope.attack
//! );
//!
//! // Hand the bank to a renderer and swap it later without stopping voices
//! let active = ActiveBank::with_bank(DecoderConfig::default(), bank.into());
//! active.refresh(&std::fs::read("gm-v2.sf2")?)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Decoder plus `synth`
//! - `synth` - [`SoundBankSystem`](synth::SoundBankSystem) and [`ActiveBank`](synth::ActiveBank)
//! - `serde` - Serialize/deserialize reader and decoder configs

/// Re-export of soundbank-riff for direct access
pub use soundbank_riff as riff;

/// Re-export of soundbank-sf2 for direct access
pub use soundbank_sf2 as sf2;

/// Re-export of soundbank-synth for direct access
#[cfg(feature = "synth")]
pub use soundbank_synth as synth;

// Decoder types
pub use soundbank_sf2::{
    program_name, BankInfo, BankSet, DecoderConfig, Envelope, FilterParams, GeneratorType,
    LoopMode, PlayableKey, PresetKeys, Sample, SoundBank, Warning, PERCUSSION_BANK,
    PROGRAM_NAMES,
};

mod error;
pub use error::{Error, Result};

/// Commonly used types
pub mod prelude {
    // Decoding
    pub use crate::sf2::{BankSet, DecoderConfig, PlayableKey, SoundBank, Warning};

    // Playback parameters
    pub use crate::sf2::{Envelope, FilterParams, LoopMode};

    // Loading and live reload
    #[cfg(feature = "synth")]
    pub use crate::synth::{ActiveBank, SoundBankHandle, SoundBankSystem};

    pub use crate::{Error, Result};
}

/// Decode a complete `.sf2` buffer with default settings.
pub fn parse(data: &[u8]) -> Result<SoundBank> {
    Ok(SoundBank::parse(data)?)
}

/// Read and decode a `.sf2` file from disk.
pub fn load(path: impl AsRef<std::path::Path>, config: &DecoderConfig) -> Result<SoundBank> {
    let data = std::fs::read(path)?;
    Ok(SoundBank::parse_with_config(&data, config)?)
}
