//! SoundFont 2 decoding for Soundbank.
//!
//! Turns a complete `.sf2` byte buffer into a queryable bank and flattens it
//! into per-key playback parameters for a sample-playback voice.
//!
//! - **[`SoundBank`]** - Parse entry point; resolved presets, instruments and samples
//! - **[`BankSet`]** - `bank -> preset -> key` lookup of [`PlayableKey`] records
//! - **[`GeneratorType`]** - The sparse generator table with SoundFont names and defaults
//! - **[`Zone`]** / [`bag_ranges`] - Index-range resolution over the flat record arrays
//! - **[`DecoderConfig`]** - Sample-rate floor and global-zone handling
//! - **[`PROGRAM_NAMES`]** - General MIDI program names
//!
//! # Example
//!
//! ```ignore
//! use soundbank_sf2::SoundBank;
//!
//! let bytes = std::fs::read("piano.sf2")?;
//! let bank = SoundBank::parse(&bytes)?;
//! if let Some(key) = bank.key(0, 0, 60) {
//!     println!("middle C plays at {}x", key.base_playback_rate);
//! }
//! for warning in bank.warnings() {
//!     eprintln!("{warning}");
//! }
//! ```

pub mod error;
pub use error::{Error, Result, Warning};

mod config;
pub use config::{DecoderConfig, DEFAULT_MIN_SAMPLE_RATE};

pub mod generator;
pub use generator::{Generator, GeneratorType, GeneratorValue, UnknownGenerator};

pub mod hydra;
pub use hydra::{Bag, Hydra, InstrumentHeader, PresetHeader, SampleHeader};

mod info;
pub use info::{BankInfo, Version};

pub mod sample;
pub use sample::{normalize_rate, Sample, SampleKind, SampleType};

pub mod zone;
pub use zone::{bag_ranges, GeneratorMap, Zone, ZoneLevel};

pub mod playable;
pub use playable::{Envelope, FilterParams, LoopMode, PlayableKey};

mod bank;
pub use bank::{BankSet, PresetKeys, KEY_COUNT, PERCUSSION_BANK};

mod program_names;
pub use program_names::{program_name, PROGRAM_NAMES};

mod structure;
pub use structure::Layout;

mod soundbank;
pub use soundbank::{Instrument, Preset, SoundBank};

#[cfg(any(test, feature = "test-util"))]
pub mod fixture;
