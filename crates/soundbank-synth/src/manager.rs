//! Sound bank file management and loading

use crate::error::{Error, Result};
use core::sync::atomic::{AtomicUsize, Ordering};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use soundbank_sf2::{DecoderConfig, SoundBank};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle to a loaded sound bank
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundBankHandle(usize);

impl SoundBankHandle {
    /// Get the internal ID (for debugging/logging only)
    pub fn id(&self) -> usize {
        self.0
    }
}

/// Sound bank manager with lock-free caching.
///
/// Every bank is decoded with the same [`DecoderConfig`]. Loading a path that
/// is already cached returns the existing handle without touching the disk.
pub struct SoundBankSystem {
    config: DecoderConfig,
    banks: DashMap<usize, Arc<SoundBank>>,
    path_to_handle: DashMap<PathBuf, SoundBankHandle>,
    next_handle: AtomicUsize,
}

impl SoundBankSystem {
    /// Create a new manager decoding with `config`
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            banks: DashMap::new(),
            path_to_handle: DashMap::new(),
            next_handle: AtomicUsize::new(0),
        }
    }

    /// Load a bank from file or return existing handle.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<SoundBankHandle> {
        let path = path.as_ref().to_path_buf();

        if let Some(handle) = self.path_to_handle.get(&path) {
            return Ok(*handle);
        }

        // Read and decode outside any map lock
        let bank = Arc::new(self.decode_file(&path)?);

        match self.path_to_handle.entry(path) {
            // Lost a race with a concurrent load of the same path
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let handle = self.insert(bank);
                tracing::debug!(
                    "Loaded sound bank {} as handle {}",
                    entry.key().display(),
                    handle.id()
                );
                entry.insert(handle);
                Ok(handle)
            }
        }
    }

    /// Decode an in-memory buffer and register it under a fresh handle.
    pub fn load_bytes(&self, data: &[u8]) -> Result<SoundBankHandle> {
        let bank = Arc::new(SoundBank::parse_with_config(data, &self.config)?);
        Ok(self.insert(bank))
    }

    /// Get a bank by handle
    pub fn get(&self, handle: &SoundBankHandle) -> Option<Arc<SoundBank>> {
        self.banks.get(&handle.0).map(|entry| entry.value().clone())
    }

    /// Replace the bank behind `handle` with a decode of `data`.
    ///
    /// The buffer is decoded first; on failure the old bank stays registered.
    /// Holders of the previous `Arc` keep it until they drop it.
    pub fn reload(&self, handle: &SoundBankHandle, data: &[u8]) -> Result<Arc<SoundBank>> {
        if !self.banks.contains_key(&handle.0) {
            return Err(Error::UnknownHandle(handle.0));
        }

        let bank = Arc::new(SoundBank::parse_with_config(data, &self.config)?);

        match self.banks.get_mut(&handle.0) {
            Some(mut entry) => Ok(std::mem::replace(entry.value_mut(), bank)),
            // Unloaded while we were decoding
            None => Err(Error::UnknownHandle(handle.0)),
        }
    }

    /// Re-read a cached path from disk and replace its bank in place.
    ///
    /// A path that was never loaded is loaded fresh.
    pub fn reload_path(&self, path: impl AsRef<Path>) -> Result<SoundBankHandle> {
        let path = path.as_ref();
        let cached = self.path_to_handle.get(path).map(|handle| *handle);
        let Some(handle) = cached else {
            return self.load(path);
        };

        let bank = Arc::new(self.decode_file(path)?);
        match self.banks.get_mut(&handle.0) {
            Some(mut entry) => {
                *entry.value_mut() = bank;
                Ok(handle)
            }
            None => Err(Error::UnknownHandle(handle.0)),
        }
    }

    /// Drop the manager's reference to a bank. Returns the bank if it was loaded.
    pub fn unload(&self, handle: &SoundBankHandle) -> Option<Arc<SoundBank>> {
        let (_, bank) = self.banks.remove(&handle.0)?;
        self.path_to_handle.retain(|_, cached| *cached != *handle);
        Some(bank)
    }

    /// The decoder settings applied to every load
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Get the number of loaded banks
    pub fn len(&self) -> usize {
        self.banks.len()
    }

    /// Check if no banks are loaded
    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Get all loaded handles, oldest first
    pub fn handles(&self) -> Vec<SoundBankHandle> {
        let mut handles: Vec<_> = self
            .banks
            .iter()
            .map(|entry| SoundBankHandle(*entry.key()))
            .collect();
        handles.sort_unstable();
        handles
    }

    fn decode_file(&self, path: &Path) -> Result<SoundBank> {
        let data = std::fs::read(path)?;
        SoundBank::parse_with_config(&data, &self.config).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn insert(&self, bank: Arc<SoundBank>) -> SoundBankHandle {
        let handle_id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.banks.insert(handle_id, bank);
        SoundBankHandle(handle_id)
    }
}

impl Default for SoundBankSystem {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}
