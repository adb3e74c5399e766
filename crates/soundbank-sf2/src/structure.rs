//! Top-level SoundFont layout validation.
//!
//! ```text
//! RIFF 'sfbk'
//!   LIST 'INFO'  metadata sub-chunks
//!   LIST 'sdta'  smpl
//!   LIST 'pdta'  phdr pbag pmod pgen inst ibag imod igen shdr
//! ```
//!
//! Order is positional. Every mismatch is fatal.

use crate::error::{Error, Result};
use crate::hydra::PDTA_TAGS;
use soundbank_riff::{parse, Chunk, ChunkReaderConfig, FourCc};
use tracing::debug;

pub const SFBK: FourCc = FourCc(*b"sfbk");
pub const INFO: FourCc = FourCc(*b"INFO");
pub const SDTA: FourCc = FourCc(*b"sdta");
pub const PDTA: FourCc = FourCc(*b"pdta");
pub const SMPL: FourCc = FourCc(*b"smpl");

/// Located chunks of a structurally valid SoundFont.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub info: Vec<Chunk>,
    pub smpl: Chunk,
    pub pdta: [Chunk; 9],
}

impl Layout {
    /// Walk and validate the container structure of `data`.
    pub fn locate(data: &[u8]) -> Result<Self> {
        let config = ChunkReaderConfig::default();

        let top = parse(data, 0, data.len(), config)?;
        expect_count("file", 1, top.len())?;
        let riff = top[0];
        expect_tag("file", FourCc::RIFF, riff.tag)?;
        expect_tag("RIFF form", SFBK, riff.form_type(data)?)?;

        let lists = riff.children(data, config)?;
        expect_count("sfbk", 3, lists.len())?;
        for (list, form) in lists.iter().zip([INFO, SDTA, PDTA]) {
            expect_tag("sfbk", FourCc::LIST, list.tag)?;
            expect_tag("sfbk", form, list.form_type(data)?)?;
        }

        let info = lists[0].children(data, config)?;

        let sdta = lists[1].children(data, config)?;
        expect_count("sdta", 1, sdta.len())?;
        let smpl = sdta[0];
        expect_tag("sdta", SMPL, smpl.tag)?;

        let pdta = lists[2].children(data, config)?;
        let pdta: [Chunk; 9] = pdta
            .try_into()
            .map_err(|chunks: Vec<Chunk>| Error::UnexpectedChunkCount {
                context: "pdta",
                expected: 9,
                found: chunks.len(),
            })?;
        for (chunk, expected) in pdta.iter().zip(PDTA_TAGS) {
            expect_tag("pdta", expected, chunk.tag)?;
        }

        debug!(
            "SoundFont layout: {} INFO chunks, {} bytes of sample data",
            info.len(),
            smpl.size
        );

        Ok(Self { info, smpl, pdta })
    }
}

fn expect_count(context: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::UnexpectedChunkCount {
            context,
            expected,
            found,
        })
    }
}

fn expect_tag(context: &'static str, expected: FourCc, found: FourCc) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::UnexpectedChunkTag {
            context,
            expected,
            found,
        })
    }
}
