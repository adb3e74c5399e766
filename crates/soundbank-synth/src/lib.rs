//! Load surface for a sample-playback synthesizer.
//!
//! - **[`SoundBankSystem`]** - Handle-based cache of decoded banks, loaded from paths or bytes
//! - **[`ActiveBank`]** - The bank a voice renderer reads from, replaced by pointer on reload
//!
//! Decoding never happens on the render side: a new bank is parsed completely,
//! then published. Voices that still hold the previous `Arc<SoundBank>` (or its
//! `Arc<[i16]>` sample data) keep it alive until they finish.

pub mod error;
pub use error::{Error, Result};

mod manager;
pub use manager::{SoundBankHandle, SoundBankSystem};

mod active;
pub use active::ActiveBank;

pub use soundbank_sf2::{DecoderConfig, PlayableKey, SoundBank};

#[cfg(test)]
pub(crate) mod test_bank {
    use soundbank_sf2::fixture::BankBuilder;

    /// Builds an empty bank whose `INAM` is `name`.
    pub fn empty(name: &str) -> Vec<u8> {
        BankBuilder::new()
            .info(b"ifil", &[2, 0, 1, 0])
            .text(b"INAM", name)
            .build()
    }
}
