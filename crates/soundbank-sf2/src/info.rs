//! `INFO` list metadata.
//!
//! Metadata never affects playback. Unknown sub-chunks are ignored and a
//! malformed version field is dropped rather than failing the load.

use soundbank_riff::Chunk;
use tracing::debug;

/// A `major.minor` version field (`ifil`, `iver`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

/// Descriptive metadata from the `INFO` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BankInfo {
    /// Format version (`ifil`)
    pub version: Option<Version>,
    /// Target sound engine (`isng`)
    pub sound_engine: Option<String>,
    /// Bank name (`INAM`)
    pub name: Option<String>,
    /// Sound ROM name (`irom`)
    pub rom_name: Option<String>,
    /// Sound ROM version (`iver`)
    pub rom_version: Option<Version>,
    /// Creation date (`ICRD`)
    pub creation_date: Option<String>,
    /// Sound designers (`IENG`)
    pub engineers: Option<String>,
    /// Intended product (`IPRD`)
    pub product: Option<String>,
    /// Copyright (`ICOP`)
    pub copyright: Option<String>,
    /// Comments (`ICMT`)
    pub comments: Option<String>,
    /// Creating tools (`ISFT`)
    pub software: Option<String>,
}

impl BankInfo {
    /// Collect metadata from the already-walked `INFO` sub-chunks.
    pub fn from_chunks(data: &[u8], chunks: &[Chunk]) -> Self {
        let mut info = Self::default();

        for chunk in chunks {
            let payload = chunk.payload(data);
            match chunk.tag.as_bytes() {
                b"ifil" => info.version = read_version(payload),
                b"iver" => info.rom_version = read_version(payload),
                b"isng" => info.sound_engine = Some(read_text(payload)),
                b"INAM" => info.name = Some(read_text(payload)),
                b"irom" => info.rom_name = Some(read_text(payload)),
                b"ICRD" => info.creation_date = Some(read_text(payload)),
                b"IENG" => info.engineers = Some(read_text(payload)),
                b"IPRD" => info.product = Some(read_text(payload)),
                b"ICOP" => info.copyright = Some(read_text(payload)),
                b"ICMT" => info.comments = Some(read_text(payload)),
                b"ISFT" => info.software = Some(read_text(payload)),
                _ => debug!("Ignoring INFO sub-chunk '{}'", chunk.tag),
            }
        }

        info
    }
}

fn read_version(payload: &[u8]) -> Option<Version> {
    match payload {
        [a, b, c, d, ..] => Some(Version {
            major: u16::from_le_bytes([*a, *b]),
            minor: u16::from_le_bytes([*c, *d]),
        }),
        _ => None,
    }
}

fn read_text(payload: &[u8]) -> String {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    String::from_utf8_lossy(&payload[..end]).into_owned()
}
