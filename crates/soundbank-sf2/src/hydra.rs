//! The nine fixed-width record arrays of the `pdta` list.
//!
//! Each array is decoded in one pass and kept flat. Index fields are left as
//! raw integers; turning them into zones happens in [`crate::zone`].

use crate::error::{Error, Result};
use crate::generator::Generator;
use soundbank_riff::{Chunk, FourCc, RecordCursor};
use tracing::debug;

pub const PRESET_HEADER_SIZE: usize = 38;
pub const BAG_SIZE: usize = 4;
pub const MODULATOR_SIZE: usize = 10;
pub const GENERATOR_SIZE: usize = 4;
pub const INSTRUMENT_HEADER_SIZE: usize = 22;
pub const SAMPLE_HEADER_SIZE: usize = 46;

/// Width of the name field in preset, instrument and sample headers.
pub const NAME_SIZE: usize = 20;

/// `pdta` sub-chunk tags in their mandatory order.
pub const PDTA_TAGS: [FourCc; 9] = [
    FourCc(*b"phdr"),
    FourCc(*b"pbag"),
    FourCc(*b"pmod"),
    FourCc(*b"pgen"),
    FourCc(*b"inst"),
    FourCc(*b"ibag"),
    FourCc(*b"imod"),
    FourCc(*b"igen"),
    FourCc(*b"shdr"),
];

/// `phdr` record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresetHeader {
    pub name: String,
    pub preset: u16,
    pub bank: u16,
    pub preset_bag_index: u16,
    pub library: u32,
    pub genre: u32,
    pub morphology: u32,
}

/// `pbag` / `ibag` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bag {
    pub generator_index: u16,
    pub modulator_index: u16,
}

/// `inst` record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstrumentHeader {
    pub name: String,
    pub instrument_bag_index: u16,
}

/// `shdr` record. Positions are in sample frames from the start of `smpl`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleHeader {
    pub name: String,
    pub start: u32,
    pub end: u32,
    pub start_loop: u32,
    pub end_loop: u32,
    pub sample_rate: u32,
    pub original_pitch: u8,
    pub pitch_correction: i8,
    pub sample_link: u16,
    pub sample_type: u16,
}

/// All nine `pdta` arrays, terminal records included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hydra {
    pub preset_headers: Vec<PresetHeader>,
    pub preset_bags: Vec<Bag>,
    pub preset_modulators: Vec<Generator>,
    pub preset_generators: Vec<Generator>,
    pub instrument_headers: Vec<InstrumentHeader>,
    pub instrument_bags: Vec<Bag>,
    pub instrument_modulators: Vec<Generator>,
    pub instrument_generators: Vec<Generator>,
    pub sample_headers: Vec<SampleHeader>,
}

impl Hydra {
    /// Decode the nine `pdta` chunks, which must already be in [`PDTA_TAGS`] order.
    pub fn decode(data: &[u8], chunks: &[Chunk; 9]) -> Result<Self> {
        let [phdr, pbag, pmod, pgen, inst, ibag, imod, igen, shdr] = chunks;

        let hydra = Self {
            preset_headers: decode_records(data, phdr, PRESET_HEADER_SIZE, read_preset_header)?,
            preset_bags: decode_records(data, pbag, BAG_SIZE, read_bag)?,
            preset_modulators: decode_records(data, pmod, MODULATOR_SIZE, read_modulator)?,
            preset_generators: decode_records(data, pgen, GENERATOR_SIZE, read_generator)?,
            instrument_headers: decode_records(
                data,
                inst,
                INSTRUMENT_HEADER_SIZE,
                read_instrument_header,
            )?,
            instrument_bags: decode_records(data, ibag, BAG_SIZE, read_bag)?,
            instrument_modulators: decode_records(data, imod, MODULATOR_SIZE, read_modulator)?,
            instrument_generators: decode_records(data, igen, GENERATOR_SIZE, read_generator)?,
            sample_headers: decode_records(data, shdr, SAMPLE_HEADER_SIZE, read_sample_header)?,
        };

        check_terminal(phdr, hydra.preset_headers.last().map(|h| h.name.as_str()), "EOP");
        check_terminal(inst, hydra.instrument_headers.last().map(|h| h.name.as_str()), "EOI");
        check_terminal(shdr, hydra.sample_headers.last().map(|h| h.name.as_str()), "EOS");

        debug!(
            "Decoded pdta: {} preset headers, {} instrument headers, {} sample headers",
            hydra.preset_headers.len(),
            hydra.instrument_headers.len(),
            hydra.sample_headers.len()
        );

        Ok(hydra)
    }

    /// Tags of the header arrays that are empty and so lack their sentinel.
    pub fn missing_terminals(&self) -> Vec<FourCc> {
        let mut missing = Vec::new();
        if self.preset_headers.is_empty() {
            missing.push(PDTA_TAGS[0]);
        }
        if self.instrument_headers.is_empty() {
            missing.push(PDTA_TAGS[4]);
        }
        if self.sample_headers.is_empty() {
            missing.push(PDTA_TAGS[8]);
        }
        missing
    }
}

fn check_terminal(chunk: &Chunk, last_name: Option<&str>, expected: &str) {
    // The last record is the sentinel whatever it is called.
    if let Some(name) = last_name.filter(|&name| name != expected) {
        debug!(
            "Terminal record of '{}' is named {:?}, expected {:?}",
            chunk.tag, name, expected
        );
    }
}

/// Decode a chunk holding back-to-back records of `record_size` bytes.
pub fn decode_records<T>(
    data: &[u8],
    chunk: &Chunk,
    record_size: usize,
    read: impl Fn(&mut RecordCursor<'_>) -> soundbank_riff::Result<T>,
) -> Result<Vec<T>> {
    if chunk.size as usize % record_size != 0 {
        return Err(Error::InvalidRecordSize {
            tag: chunk.tag,
            size: chunk.size,
            record_size,
        });
    }

    let mut cursor = RecordCursor::at(chunk.payload(data), chunk.offset);
    let mut records = Vec::with_capacity(chunk.size as usize / record_size);
    while cursor.remaining() > 0 {
        records.push(read(&mut cursor)?);
    }
    Ok(records)
}

pub fn read_preset_header(cursor: &mut RecordCursor<'_>) -> soundbank_riff::Result<PresetHeader> {
    Ok(PresetHeader {
        name: cursor.read_fixed_name(NAME_SIZE)?,
        preset: cursor.read_u16()?,
        bank: cursor.read_u16()?,
        preset_bag_index: cursor.read_u16()?,
        library: cursor.read_u32()?,
        genre: cursor.read_u32()?,
        morphology: cursor.read_u32()?,
    })
}

pub fn read_bag(cursor: &mut RecordCursor<'_>) -> soundbank_riff::Result<Bag> {
    Ok(Bag {
        generator_index: cursor.read_u16()?,
        modulator_index: cursor.read_u16()?,
    })
}

/// Modulator record: only the destination operator and amount are decoded.
/// Source, amount-source and transform operators are skipped.
pub fn read_modulator(cursor: &mut RecordCursor<'_>) -> soundbank_riff::Result<Generator> {
    cursor.skip(2)?;
    let generator = read_generator(cursor)?;
    cursor.skip(4)?;
    Ok(generator)
}

pub fn read_generator(cursor: &mut RecordCursor<'_>) -> soundbank_riff::Result<Generator> {
    let code = cursor.read_u16()?;
    let lo = cursor.read_u8()?;
    let hi = cursor.read_u8()?;
    Ok(Generator::decode(code, [lo, hi]))
}

pub fn read_instrument_header(
    cursor: &mut RecordCursor<'_>,
) -> soundbank_riff::Result<InstrumentHeader> {
    Ok(InstrumentHeader {
        name: cursor.read_fixed_name(NAME_SIZE)?,
        instrument_bag_index: cursor.read_u16()?,
    })
}

pub fn read_sample_header(cursor: &mut RecordCursor<'_>) -> soundbank_riff::Result<SampleHeader> {
    Ok(SampleHeader {
        name: cursor.read_fixed_name(NAME_SIZE)?,
        start: cursor.read_u32()?,
        end: cursor.read_u32()?,
        start_loop: cursor.read_u32()?,
        end_loop: cursor.read_u32()?,
        sample_rate: cursor.read_u32()?,
        original_pitch: cursor.read_u8()?,
        pitch_correction: cursor.read_i8()?,
        sample_link: cursor.read_u16()?,
        sample_type: cursor.read_u16()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorType, GeneratorValue, UnknownGenerator};

    fn chunk_over(data: &[u8], tag: &[u8; 4]) -> Chunk {
        Chunk {
            tag: FourCc(*tag),
            size: data.len() as u32,
            offset: 0,
        }
    }

    fn name_field(name: &str) -> Vec<u8> {
        let mut out = name.as_bytes().to_vec();
        out.resize(NAME_SIZE, 0);
        out
    }

    #[test]
    fn test_preset_header_layout() {
        let mut data = name_field("Grand Piano");
        data.extend_from_slice(&5u16.to_le_bytes());
        data.extend_from_slice(&128u16.to_le_bytes());
        data.extend_from_slice(&3u16.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        assert_eq!(data.len(), PRESET_HEADER_SIZE);

        let chunk = chunk_over(&data, b"phdr");
        let headers =
            decode_records(&data, &chunk, PRESET_HEADER_SIZE, read_preset_header).unwrap();
        assert_eq!(
            headers,
            vec![PresetHeader {
                name: "Grand Piano".into(),
                preset: 5,
                bank: 128,
                preset_bag_index: 3,
                library: 1,
                genre: 2,
                morphology: 3,
            }]
        );
    }

    #[test]
    fn test_sample_header_signed_correction() {
        let mut data = name_field("Sine");
        for v in [10u32, 110, 20, 90, 44100] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data.push(69);
        data.push((-7i8) as u8);
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        assert_eq!(data.len(), SAMPLE_HEADER_SIZE);

        let chunk = chunk_over(&data, b"shdr");
        let headers =
            decode_records(&data, &chunk, SAMPLE_HEADER_SIZE, read_sample_header).unwrap();
        let header = &headers[0];
        assert_eq!(header.start, 10);
        assert_eq!(header.end, 110);
        assert_eq!(header.start_loop, 20);
        assert_eq!(header.end_loop, 90);
        assert_eq!(header.sample_rate, 44100);
        assert_eq!(header.original_pitch, 69);
        assert_eq!(header.pitch_correction, -7);
        assert_eq!(header.sample_type, 1);
    }

    #[test]
    fn test_modulator_decodes_destination_only() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x0502u16.to_le_bytes()); // source
        data.extend_from_slice(&48u16.to_le_bytes()); // initialAttenuation
        data.extend_from_slice(&960i16.to_le_bytes());
        data.extend_from_slice(&0x0102u16.to_le_bytes()); // amount source
        data.extend_from_slice(&0u16.to_le_bytes()); // transform
        data.extend_from_slice(&[0, 0, 49, 0, 7, 0, 0, 0, 0, 0]);

        let chunk = chunk_over(&data, b"pmod");
        let mods = decode_records(&data, &chunk, MODULATOR_SIZE, read_modulator).unwrap();
        assert_eq!(
            mods,
            vec![
                Generator::Known {
                    kind: GeneratorType::InitialAttenuation,
                    value: GeneratorValue::Amount(960)
                },
                Generator::Unknown(UnknownGenerator {
                    code: 49,
                    amount: 7,
                    lo: 7,
                    hi: 0
                }),
            ]
        );
    }

    #[test]
    fn test_partial_record_is_rejected() {
        let data = [0u8; 6];
        let chunk = chunk_over(&data, b"pbag");
        let err = decode_records(&data, &chunk, BAG_SIZE, read_bag).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidRecordSize {
                tag: FourCc(*b"pbag"),
                size: 6,
                record_size: 4
            }
        );
    }

    #[test]
    fn test_empty_chunk_decodes_empty() {
        let data: [u8; 0] = [];
        let chunk = chunk_over(&data, b"imod");
        let mods = decode_records(&data, &chunk, MODULATOR_SIZE, read_modulator).unwrap();
        assert!(mods.is_empty());
    }
}
