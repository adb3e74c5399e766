//! The `bank -> preset -> key` lookup table.

use crate::playable::PlayableKey;
use std::collections::BTreeMap;

/// Bank number General MIDI uses for percussion kits.
pub const PERCUSSION_BANK: u16 = 128;

/// Number of MIDI keys per preset.
pub const KEY_COUNT: usize = 128;

/// The 128 key slots of one preset.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetKeys {
    name: String,
    keys: Vec<Option<PlayableKey>>,
}

impl PresetKeys {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: vec![None; KEY_COUNT],
        }
    }

    /// Name of the preset header this entry was created from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: u8) -> Option<&PlayableKey> {
        self.keys.get(key as usize).and_then(Option::as_ref)
    }

    pub fn contains(&self, key: u8) -> bool {
        self.get(key).is_some()
    }

    /// Store `playable` unless the key is already taken. Returns whether it was stored.
    pub fn insert_if_absent(&mut self, playable: PlayableKey) -> bool {
        match self.keys.get_mut(playable.key as usize) {
            Some(slot) if slot.is_none() => {
                *slot = Some(playable);
                true
            }
            _ => false,
        }
    }

    /// Populated keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayableKey> + '_ {
        self.keys.iter().flatten()
    }

    /// Number of populated keys.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.iter().all(Option::is_none)
    }
}

/// Playable keys of every preset, addressed by bank and preset number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankSet {
    banks: BTreeMap<u16, BTreeMap<u16, PresetKeys>>,
}

impl BankSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bank: u16, preset: u16, key: u8) -> Option<&PlayableKey> {
        self.preset(bank, preset)?.get(key)
    }

    pub fn preset(&self, bank: u16, preset: u16) -> Option<&PresetKeys> {
        self.banks.get(&bank)?.get(&preset)
    }

    /// Entry for `(bank, preset)`, created empty on first use.
    pub fn preset_entry(&mut self, bank: u16, preset: u16, name: &str) -> &mut PresetKeys {
        self.banks
            .entry(bank)
            .or_default()
            .entry(preset)
            .or_insert_with(|| PresetKeys::new(name))
    }

    /// Replace `(bank, preset)` with a fresh empty entry.
    ///
    /// A later header with the same numbers discards whatever an earlier one
    /// stored, name and keys alike.
    pub fn reset_preset(&mut self, bank: u16, preset: u16, name: &str) -> &mut PresetKeys {
        let slot = self.preset_entry(bank, preset, name);
        *slot = PresetKeys::new(name);
        slot
    }

    /// Bank numbers in ascending order.
    pub fn banks(&self) -> impl Iterator<Item = u16> + '_ {
        self.banks.keys().copied()
    }

    /// Presets of one bank in ascending order.
    pub fn presets(&self, bank: u16) -> impl Iterator<Item = (u16, &PresetKeys)> + '_ {
        self.banks
            .get(&bank)
            .into_iter()
            .flat_map(|presets| presets.iter().map(|(number, keys)| (*number, keys)))
    }

    /// Total populated keys across all presets.
    pub fn key_count(&self) -> usize {
        self.banks
            .values()
            .flat_map(BTreeMap::values)
            .map(PresetKeys::len)
            .sum()
    }

    /// Number of `(bank, preset)` entries.
    pub fn preset_count(&self) -> usize {
        self.banks.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}
