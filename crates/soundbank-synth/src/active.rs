//! The bank a voice renderer currently plays from.

use crate::error::Result;
use arc_swap::ArcSwapOption;
use soundbank_sf2::{DecoderConfig, PlayableKey, SoundBank};
use std::sync::Arc;

/// Lock-free slot holding the live [`SoundBank`].
///
/// Readers take a snapshot with [`current`](Self::current) and never block.
/// Replacing the bank swaps the pointer; the previous bank is freed once the
/// last voice holding it lets go.
pub struct ActiveBank {
    config: DecoderConfig,
    bank: ArcSwapOption<SoundBank>,
}

impl ActiveBank {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            bank: ArcSwapOption::empty(),
        }
    }

    pub fn with_bank(config: DecoderConfig, bank: Arc<SoundBank>) -> Self {
        Self {
            config,
            bank: ArcSwapOption::from(Some(bank)),
        }
    }

    #[inline]
    pub fn current(&self) -> Option<Arc<SoundBank>> {
        self.bank.load_full()
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.bank.load().is_some()
    }

    /// Look up one key in the live bank, cloned out of the snapshot.
    pub fn key(&self, bank: u16, preset: u16, key: u8) -> Option<PlayableKey> {
        let guard = self.bank.load();
        (*guard).as_ref()?.key(bank, preset, key).cloned()
    }

    /// Publish `bank`, returning the one it replaced.
    pub fn replace(&self, bank: Arc<SoundBank>) -> Option<Arc<SoundBank>> {
        self.bank.swap(Some(bank))
    }

    /// Decode `data` and publish it.
    ///
    /// On a structural error the live bank is left untouched.
    pub fn refresh(&self, data: &[u8]) -> Result<Arc<SoundBank>> {
        let bank = match SoundBank::parse_with_config(data, &self.config) {
            Ok(bank) => Arc::new(bank),
            Err(e) => {
                tracing::warn!("Keeping previous sound bank, reload failed: {}", e);
                return Err(e.into());
            }
        };

        if !bank.warnings().is_empty() {
            tracing::debug!("Reloaded sound bank with {} warnings", bank.warnings().len());
        }
        self.bank.store(Some(bank.clone()));
        Ok(bank)
    }

    pub fn clear(&self) -> Option<Arc<SoundBank>> {
        self.bank.swap(None)
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }
}

impl Default for ActiveBank {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}
