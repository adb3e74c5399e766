//! Chunk reader configuration.

/// Byte order of the 32-bit chunk size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endian {
    /// `RIFF` files (default)
    #[default]
    Little,
    /// `RIFX` style containers
    Big,
}

impl Endian {
    /// Decode a size field in this byte order.
    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// Configuration for one chunk scan.
///
/// Every call site in the SoundFont decoder uses the default
/// (little-endian, padded); nested scans pass their own config explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkReaderConfig {
    /// Byte order of the size field (default: little-endian)
    pub endian: Endian,
    /// Skip a pad byte after odd-sized payloads (default: true)
    pub padding: bool,
}

impl Default for ChunkReaderConfig {
    fn default() -> Self {
        Self {
            endian: Endian::Little,
            padding: true,
        }
    }
}

impl ChunkReaderConfig {
    /// Config with big-endian size fields.
    pub fn big_endian() -> Self {
        Self {
            endian: Endian::Big,
            ..Default::default()
        }
    }

    /// Same config with pad-byte handling switched on or off.
    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }
}
