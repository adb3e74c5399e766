//! Synthetic `.sf2` buffers for tests.
//!
//! Compiled for this crate's unit tests and, behind the `test-util` feature,
//! for downstream test suites, so every test writes banks the same way.
//!
//! [`BankBuilder`] writes a complete file:
//!
//! - `LIST INFO` with whatever chunks were added
//! - `LIST sdta` with one `smpl` blob, samples concatenated in insertion order
//! - `LIST pdta` with all nine record chunks and their terminal records

use crate::generator::GeneratorType;

pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 9);
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
    out
}

pub fn list(form: &[u8; 4], body: &[u8]) -> Vec<u8> {
    chunk(b"LIST", &[form.as_slice(), body].concat())
}

pub fn riff(form: &[u8; 4], body: &[u8]) -> Vec<u8> {
    chunk(b"RIFF", &[form.as_slice(), body].concat())
}

fn name(out: &mut Vec<u8>, name: &str) {
    let mut field = name.as_bytes().to_vec();
    field.truncate(20);
    field.resize(20, 0);
    out.extend_from_slice(&field);
}

/// Raw generator record: operator code and two amount bytes.
pub type RawGen = (u16, [u8; 2]);

pub fn amount(kind: GeneratorType, amount: i16) -> RawGen {
    (kind.code(), amount.to_le_bytes())
}

pub fn range(kind: GeneratorType, lo: u8, hi: u8) -> RawGen {
    (kind.code(), [lo, hi])
}

pub fn raw(code: u16, amount: i16) -> RawGen {
    (code, amount.to_le_bytes())
}

/// Generator and modulator records of one zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneSpec {
    generators: Vec<RawGen>,
    modulators: Vec<(u16, i16)>,
}

impl ZoneSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(mut self, kind: GeneratorType, value: i16) -> Self {
        self.generators.push(amount(kind, value));
        self
    }

    pub fn keys(mut self, lo: u8, hi: u8) -> Self {
        self.generators.push(range(GeneratorType::KeyRange, lo, hi));
        self
    }

    /// A generator record whose code may not be in the table.
    pub fn raw(mut self, code: u16, value: i16) -> Self {
        self.generators.push(raw(code, value));
        self
    }

    pub fn sample(self, index: i16) -> Self {
        self.amount(GeneratorType::SampleId, index)
    }

    pub fn instrument(self, index: i16) -> Self {
        self.amount(GeneratorType::Instrument, index)
    }

    /// A modulator routed to `destination`.
    pub fn modulator(mut self, destination: u16, value: i16) -> Self {
        self.modulators.push((destination, value));
        self
    }
}

impl From<Vec<RawGen>> for ZoneSpec {
    fn from(generators: Vec<RawGen>) -> Self {
        Self {
            generators,
            modulators: Vec::new(),
        }
    }
}

struct FixtureSample {
    name: String,
    frames: Vec<i16>,
    rate: u32,
    loops: (u32, u32),
    pitch: u8,
    correction: i8,
    sample_type: u16,
}

struct FixtureHeader {
    name: String,
    preset: u16,
    bank: u16,
    zones: Vec<ZoneSpec>,
}

/// Builds a complete SoundFont from presets, instruments and samples.
///
/// Indices are assigned in insertion order. Terminal records are appended
/// automatically.
#[derive(Default)]
pub struct BankBuilder {
    info: Vec<u8>,
    samples: Vec<FixtureSample>,
    instruments: Vec<FixtureHeader>,
    presets: Vec<FixtureHeader>,
    dropped: Vec<[u8; 4]>,
}

impl BankBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.info.extend_from_slice(&chunk(tag, payload));
        self
    }

    /// Add a NUL-terminated text chunk to `INFO`.
    pub fn text(self, tag: &[u8; 4], value: &str) -> Self {
        let mut payload = value.as_bytes().to_vec();
        payload.push(0);
        self.info(tag, &payload)
    }

    /// Add a sample. Loop points are relative to the sample's first frame.
    pub fn sample(mut self, name: &str, frames: Vec<i16>, rate: u32, loops: (u32, u32)) -> Self {
        self.samples.push(FixtureSample {
            name: name.into(),
            frames,
            rate,
            loops,
            pitch: 60,
            correction: 0,
            sample_type: 1,
        });
        self
    }

    /// Add a 44.1 kHz sample looping over its middle half.
    pub fn tone(self, name: &str, frames: Vec<i16>) -> Self {
        let len = frames.len() as u32;
        self.sample(name, frames, 44100, (len / 4, len - len / 4))
    }

    pub fn rate(mut self, rate: u32) -> Self {
        if let Some(sample) = self.samples.last_mut() {
            sample.rate = rate;
        }
        self
    }

    pub fn loops(mut self, start: u32, end: u32) -> Self {
        if let Some(sample) = self.samples.last_mut() {
            sample.loops = (start, end);
        }
        self
    }

    /// Set pitch fields of the most recently added sample.
    pub fn pitch(mut self, original_pitch: u8, correction: i8) -> Self {
        if let Some(sample) = self.samples.last_mut() {
            sample.pitch = original_pitch;
            sample.correction = correction;
        }
        self
    }

    /// Set the raw `sfSampleType` of the most recently added sample.
    pub fn sample_type(mut self, sample_type: u16) -> Self {
        if let Some(sample) = self.samples.last_mut() {
            sample.sample_type = sample_type;
        }
        self
    }

    pub fn instrument<Z: Into<ZoneSpec>>(mut self, name: &str, zones: Vec<Z>) -> Self {
        self.instruments.push(FixtureHeader {
            name: name.into(),
            preset: 0,
            bank: 0,
            zones: zones.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn preset<Z: Into<ZoneSpec>>(
        mut self,
        name: &str,
        bank: u16,
        preset: u16,
        zones: Vec<Z>,
    ) -> Self {
        self.presets.push(FixtureHeader {
            name: name.into(),
            preset,
            bank,
            zones: zones.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Leave a `pdta` sub-chunk out of the output.
    pub fn drop_pdta_chunk(mut self, tag: &[u8; 4]) -> Self {
        self.dropped.push(*tag);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut smpl = Vec::new();
        let mut shdr = Vec::new();
        let mut offset = 0u32;
        for sample in &self.samples {
            let len = sample.frames.len() as u32;
            smpl.extend(sample.frames.iter().flat_map(|f| f.to_le_bytes()));
            name(&mut shdr, &sample.name);
            for v in [
                offset,
                offset + len,
                offset + sample.loops.0,
                offset + sample.loops.1,
                sample.rate,
            ] {
                shdr.extend_from_slice(&v.to_le_bytes());
            }
            shdr.push(sample.pitch);
            shdr.push(sample.correction as u8);
            shdr.extend_from_slice(&0u16.to_le_bytes());
            shdr.extend_from_slice(&sample.sample_type.to_le_bytes());
            offset += len;
        }
        name(&mut shdr, "EOS");
        shdr.extend_from_slice(&[0; 26]);

        let [inst, ibag, imod, igen] = encode_level(&self.instruments, false);
        let [phdr, pbag, pmod, pgen] = encode_level(&self.presets, true);

        let pdta_chunks: [(&[u8; 4], Vec<u8>); 9] = [
            (b"phdr", phdr),
            (b"pbag", pbag),
            (b"pmod", pmod),
            (b"pgen", pgen),
            (b"inst", inst),
            (b"ibag", ibag),
            (b"imod", imod),
            (b"igen", igen),
            (b"shdr", shdr),
        ];
        let pdta: Vec<u8> = pdta_chunks
            .iter()
            .filter(|(tag, _)| !self.dropped.contains(*tag))
            .flat_map(|(tag, payload)| chunk(tag, payload))
            .collect();

        let body = [
            list(b"INFO", &self.info),
            list(b"sdta", &chunk(b"smpl", &smpl)),
            list(b"pdta", &pdta),
        ]
        .concat();
        riff(b"sfbk", &body)
    }
}

/// Encode headers, bags, modulators and generators for one level.
fn encode_level(headers: &[FixtureHeader], presets: bool) -> [Vec<u8>; 4] {
    let mut hdr = Vec::new();
    let mut bag = Vec::new();
    let mut modulators = Vec::new();
    let mut gen = Vec::new();
    let mut bag_index = 0u16;
    let mut mod_index = 0u16;
    let mut gen_index = 0u16;

    let write_header = |out: &mut Vec<u8>, name_str: &str, preset: u16, bank: u16, bag_index: u16| {
        name(out, name_str);
        if presets {
            out.extend_from_slice(&preset.to_le_bytes());
            out.extend_from_slice(&bank.to_le_bytes());
            out.extend_from_slice(&bag_index.to_le_bytes());
            out.extend_from_slice(&[0; 12]);
        } else {
            out.extend_from_slice(&bag_index.to_le_bytes());
        }
    };

    for header in headers {
        write_header(&mut hdr, &header.name, header.preset, header.bank, bag_index);
        for zone in &header.zones {
            bag.extend_from_slice(&gen_index.to_le_bytes());
            bag.extend_from_slice(&mod_index.to_le_bytes());
            bag_index += 1;
            for (code, amount) in &zone.generators {
                gen.extend_from_slice(&code.to_le_bytes());
                gen.extend_from_slice(amount);
                gen_index += 1;
            }
            for (destination, amount) in &zone.modulators {
                // Source: note-on velocity, negative, concave
                modulators.extend_from_slice(&0x0502u16.to_le_bytes());
                modulators.extend_from_slice(&destination.to_le_bytes());
                modulators.extend_from_slice(&amount.to_le_bytes());
                modulators.extend_from_slice(&[0; 4]);
                mod_index += 1;
            }
        }
    }

    let terminal = if presets { "EOP" } else { "EOI" };
    write_header(&mut hdr, terminal, 0, 0, bag_index);
    bag.extend_from_slice(&gen_index.to_le_bytes());
    bag.extend_from_slice(&mod_index.to_le_bytes());
    modulators.extend_from_slice(&[0; 10]);
    gen.extend_from_slice(&[0; 4]);

    [hdr, bag, modulators, gen]
}
