//! Generator enumeration and generator/modulator amount decoding.
//!
//! Operator codes run from 0 to 58 with holes at 14, 18, 19, 20, 42, 49 and
//! 55 (reserved or deprecated in SoundFont 2.04). A code outside the table
//! is never an error: it decodes to [`Generator::Unknown`] carrying both
//! raw interpretations of its amount.

use std::fmt;

/// A named SoundFont generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum GeneratorType {
    StartAddrsOffset = 0,
    EndAddrsOffset = 1,
    StartloopAddrsOffset = 2,
    EndloopAddrsOffset = 3,
    StartAddrsCoarseOffset = 4,
    ModLfoToPitch = 5,
    VibLfoToPitch = 6,
    ModEnvToPitch = 7,
    InitialFilterFc = 8,
    InitialFilterQ = 9,
    ModLfoToFilterFc = 10,
    ModEnvToFilterFc = 11,
    EndAddrsCoarseOffset = 12,
    ModLfoToVolume = 13,
    ChorusEffectsSend = 15,
    ReverbEffectsSend = 16,
    Pan = 17,
    DelayModLfo = 21,
    FreqModLfo = 22,
    DelayVibLfo = 23,
    FreqVibLfo = 24,
    DelayModEnv = 25,
    AttackModEnv = 26,
    HoldModEnv = 27,
    DecayModEnv = 28,
    SustainModEnv = 29,
    ReleaseModEnv = 30,
    KeynumToModEnvHold = 31,
    KeynumToModEnvDecay = 32,
    DelayVolEnv = 33,
    AttackVolEnv = 34,
    HoldVolEnv = 35,
    DecayVolEnv = 36,
    SustainVolEnv = 37,
    ReleaseVolEnv = 38,
    KeynumToVolEnvHold = 39,
    KeynumToVolEnvDecay = 40,
    Instrument = 41,
    KeyRange = 43,
    VelRange = 44,
    StartloopAddrsCoarseOffset = 45,
    Keynum = 46,
    Velocity = 47,
    InitialAttenuation = 48,
    EndloopAddrsCoarseOffset = 50,
    CoarseTune = 51,
    FineTune = 52,
    SampleId = 53,
    SampleModes = 54,
    ScaleTuning = 56,
    ExclusiveClass = 57,
    OverridingRootKey = 58,
}

impl GeneratorType {
    /// Every named generator, in code order.
    pub const ALL: [GeneratorType; 52] = [
        Self::StartAddrsOffset,
        Self::EndAddrsOffset,
        Self::StartloopAddrsOffset,
        Self::EndloopAddrsOffset,
        Self::StartAddrsCoarseOffset,
        Self::ModLfoToPitch,
        Self::VibLfoToPitch,
        Self::ModEnvToPitch,
        Self::InitialFilterFc,
        Self::InitialFilterQ,
        Self::ModLfoToFilterFc,
        Self::ModEnvToFilterFc,
        Self::EndAddrsCoarseOffset,
        Self::ModLfoToVolume,
        Self::ChorusEffectsSend,
        Self::ReverbEffectsSend,
        Self::Pan,
        Self::DelayModLfo,
        Self::FreqModLfo,
        Self::DelayVibLfo,
        Self::FreqVibLfo,
        Self::DelayModEnv,
        Self::AttackModEnv,
        Self::HoldModEnv,
        Self::DecayModEnv,
        Self::SustainModEnv,
        Self::ReleaseModEnv,
        Self::KeynumToModEnvHold,
        Self::KeynumToModEnvDecay,
        Self::DelayVolEnv,
        Self::AttackVolEnv,
        Self::HoldVolEnv,
        Self::DecayVolEnv,
        Self::SustainVolEnv,
        Self::ReleaseVolEnv,
        Self::KeynumToVolEnvHold,
        Self::KeynumToVolEnvDecay,
        Self::Instrument,
        Self::KeyRange,
        Self::VelRange,
        Self::StartloopAddrsCoarseOffset,
        Self::Keynum,
        Self::Velocity,
        Self::InitialAttenuation,
        Self::EndloopAddrsCoarseOffset,
        Self::CoarseTune,
        Self::FineTune,
        Self::SampleId,
        Self::SampleModes,
        Self::ScaleTuning,
        Self::ExclusiveClass,
        Self::OverridingRootKey,
    ];

    /// Look up an operator code. Returns `None` for gaps and codes above 58.
    pub fn from_code(code: u16) -> Option<Self> {
        use GeneratorType::*;
        let kind = match code {
            0 => StartAddrsOffset,
            1 => EndAddrsOffset,
            2 => StartloopAddrsOffset,
            3 => EndloopAddrsOffset,
            4 => StartAddrsCoarseOffset,
            5 => ModLfoToPitch,
            6 => VibLfoToPitch,
            7 => ModEnvToPitch,
            8 => InitialFilterFc,
            9 => InitialFilterQ,
            10 => ModLfoToFilterFc,
            11 => ModEnvToFilterFc,
            12 => EndAddrsCoarseOffset,
            13 => ModLfoToVolume,
            15 => ChorusEffectsSend,
            16 => ReverbEffectsSend,
            17 => Pan,
            21 => DelayModLfo,
            22 => FreqModLfo,
            23 => DelayVibLfo,
            24 => FreqVibLfo,
            25 => DelayModEnv,
            26 => AttackModEnv,
            27 => HoldModEnv,
            28 => DecayModEnv,
            29 => SustainModEnv,
            30 => ReleaseModEnv,
            31 => KeynumToModEnvHold,
            32 => KeynumToModEnvDecay,
            33 => DelayVolEnv,
            34 => AttackVolEnv,
            35 => HoldVolEnv,
            36 => DecayVolEnv,
            37 => SustainVolEnv,
            38 => ReleaseVolEnv,
            39 => KeynumToVolEnvHold,
            40 => KeynumToVolEnvDecay,
            41 => Instrument,
            43 => KeyRange,
            44 => VelRange,
            45 => StartloopAddrsCoarseOffset,
            46 => Keynum,
            47 => Velocity,
            48 => InitialAttenuation,
            50 => EndloopAddrsCoarseOffset,
            51 => CoarseTune,
            52 => FineTune,
            53 => SampleId,
            54 => SampleModes,
            56 => ScaleTuning,
            57 => ExclusiveClass,
            58 => OverridingRootKey,
            _ => return None,
        };
        Some(kind)
    }

    /// Operator code as stored in the file.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// SoundFont name of the generator.
    pub fn name(self) -> &'static str {
        use GeneratorType::*;
        match self {
            StartAddrsOffset => "startAddrsOffset",
            EndAddrsOffset => "endAddrsOffset",
            StartloopAddrsOffset => "startloopAddrsOffset",
            EndloopAddrsOffset => "endloopAddrsOffset",
            StartAddrsCoarseOffset => "startAddrsCoarseOffset",
            ModLfoToPitch => "modLfoToPitch",
            VibLfoToPitch => "vibLfoToPitch",
            ModEnvToPitch => "modEnvToPitch",
            InitialFilterFc => "initialFilterFc",
            InitialFilterQ => "initialFilterQ",
            ModLfoToFilterFc => "modLfoToFilterFc",
            ModEnvToFilterFc => "modEnvToFilterFc",
            EndAddrsCoarseOffset => "endAddrsCoarseOffset",
            ModLfoToVolume => "modLfoToVolume",
            ChorusEffectsSend => "chorusEffectsSend",
            ReverbEffectsSend => "reverbEffectsSend",
            Pan => "pan",
            DelayModLfo => "delayModLFO",
            FreqModLfo => "freqModLFO",
            DelayVibLfo => "delayVibLFO",
            FreqVibLfo => "freqVibLFO",
            DelayModEnv => "delayModEnv",
            AttackModEnv => "attackModEnv",
            HoldModEnv => "holdModEnv",
            DecayModEnv => "decayModEnv",
            SustainModEnv => "sustainModEnv",
            ReleaseModEnv => "releaseModEnv",
            KeynumToModEnvHold => "keynumToModEnvHold",
            KeynumToModEnvDecay => "keynumToModEnvDecay",
            DelayVolEnv => "delayVolEnv",
            AttackVolEnv => "attackVolEnv",
            HoldVolEnv => "holdVolEnv",
            DecayVolEnv => "decayVolEnv",
            SustainVolEnv => "sustainVolEnv",
            ReleaseVolEnv => "releaseVolEnv",
            KeynumToVolEnvHold => "keynumToVolEnvHold",
            KeynumToVolEnvDecay => "keynumToVolEnvDecay",
            Instrument => "instrument",
            KeyRange => "keyRange",
            VelRange => "velRange",
            StartloopAddrsCoarseOffset => "startloopAddrsCoarseOffset",
            Keynum => "keynum",
            Velocity => "velocity",
            InitialAttenuation => "initialAttenuation",
            EndloopAddrsCoarseOffset => "endloopAddrsCoarseOffset",
            CoarseTune => "coarseTune",
            FineTune => "fineTune",
            SampleId => "sampleID",
            SampleModes => "sampleModes",
            ScaleTuning => "scaleTuning",
            ExclusiveClass => "exclusiveClass",
            OverridingRootKey => "overridingRootKey",
        }
    }

    /// Whether the amount is a `lo`/`hi` byte pair rather than a signed word.
    pub fn is_range(self) -> bool {
        matches!(
            self,
            Self::KeyRange | Self::VelRange | Self::Keynum | Self::Velocity
        )
    }

    /// SoundFont 2.04 default amount for a generator absent from a zone.
    pub fn default_amount(self) -> i16 {
        use GeneratorType::*;
        match self {
            InitialFilterFc => 13500,
            DelayModLfo | DelayVibLfo | DelayModEnv | AttackModEnv | HoldModEnv | DecayModEnv
            | ReleaseModEnv | DelayVolEnv | AttackVolEnv | HoldVolEnv | DecayVolEnv
            | ReleaseVolEnv => -12000,
            ScaleTuning => 100,
            Keynum | Velocity | OverridingRootKey => -1,
            _ => 0,
        }
    }
}

impl fmt::Display for GeneratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded amount of a named generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeneratorValue {
    /// Signed 16-bit amount
    Amount(i16),
    /// Inclusive `lo..=hi` byte range
    Range { lo: u8, hi: u8 },
}

impl GeneratorValue {
    /// The value as a signed word, reinterpreting a range's two bytes.
    pub fn amount(self) -> i16 {
        match self {
            Self::Amount(amount) => amount,
            Self::Range { lo, hi } => i16::from_le_bytes([lo, hi]),
        }
    }

    /// The value as a byte range, reinterpreting an amount's two bytes.
    pub fn range(self) -> (u8, u8) {
        match self {
            Self::Amount(amount) => {
                let [lo, hi] = amount.to_le_bytes();
                (lo, hi)
            }
            Self::Range { lo, hi } => (lo, hi),
        }
    }
}

/// A generator code missing from the table, with both readings of its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnknownGenerator {
    pub code: u16,
    pub amount: i16,
    pub lo: u8,
    pub hi: u8,
}

/// One decoded generator (or modulator destination) record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Generator {
    Known {
        kind: GeneratorType,
        value: GeneratorValue,
    },
    Unknown(UnknownGenerator),
}

impl Generator {
    /// Decode an operator code and its two amount bytes.
    pub fn decode(code: u16, amount: [u8; 2]) -> Self {
        let [lo, hi] = amount;
        match GeneratorType::from_code(code) {
            Some(kind) if kind.is_range() => Self::Known {
                kind,
                value: GeneratorValue::Range { lo, hi },
            },
            Some(kind) => Self::Known {
                kind,
                value: GeneratorValue::Amount(i16::from_le_bytes(amount)),
            },
            None => Self::Unknown(UnknownGenerator {
                code,
                amount: i16::from_le_bytes(amount),
                lo,
                hi,
            }),
        }
    }

    /// Raw operator code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Known { kind, .. } => kind.code(),
            Self::Unknown(unknown) => unknown.code,
        }
    }

    /// Generator type, if the code is in the table.
    pub fn kind(&self) -> Option<GeneratorType> {
        match self {
            Self::Known { kind, .. } => Some(*kind),
            Self::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_round_trips_codes() {
        for kind in GeneratorType::ALL {
            assert_eq!(GeneratorType::from_code(kind.code()), Some(kind));
        }
        let named = (0..=58u16)
            .filter(|&c| GeneratorType::from_code(c).is_some())
            .count();
        assert_eq!(named, GeneratorType::ALL.len());
    }

    #[test]
    fn test_gaps_are_unnamed() {
        for code in [14, 18, 19, 20, 42, 49, 55, 59, 60, 0xffff] {
            assert_eq!(GeneratorType::from_code(code), None, "code {}", code);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(GeneratorType::SampleId.name(), "sampleID");
        assert_eq!(GeneratorType::FreqVibLfo.to_string(), "freqVibLFO");
        assert_eq!(GeneratorType::KeyRange.name(), "keyRange");
    }

    #[test]
    fn test_range_generators() {
        let ranged: Vec<_> = GeneratorType::ALL
            .iter()
            .filter(|k| k.is_range())
            .copied()
            .collect();
        assert_eq!(
            ranged,
            vec![
                GeneratorType::KeyRange,
                GeneratorType::VelRange,
                GeneratorType::Keynum,
                GeneratorType::Velocity
            ]
        );
    }

    #[test]
    fn test_decode_amount_is_signed() {
        let gen = Generator::decode(51, (-12i16).to_le_bytes());
        assert_eq!(
            gen,
            Generator::Known {
                kind: GeneratorType::CoarseTune,
                value: GeneratorValue::Amount(-12)
            }
        );
    }

    #[test]
    fn test_decode_range_bytes() {
        let gen = Generator::decode(43, [60, 67]);
        assert_eq!(
            gen,
            Generator::Known {
                kind: GeneratorType::KeyRange,
                value: GeneratorValue::Range { lo: 60, hi: 67 }
            }
        );
    }

    #[test]
    fn test_decode_unknown_keeps_both_readings() {
        for code in [14u16, 49, 55] {
            let gen = Generator::decode(code, [0x34, 0x92]);
            assert_eq!(
                gen,
                Generator::Unknown(UnknownGenerator {
                    code,
                    amount: i16::from_le_bytes([0x34, 0x92]),
                    lo: 0x34,
                    hi: 0x92
                })
            );
            assert_eq!(gen.code(), code);
            assert_eq!(gen.kind(), None);
        }
    }

    #[test]
    fn test_value_reinterpretation() {
        assert_eq!(GeneratorValue::Range { lo: 1, hi: 2 }.amount(), 0x0201);
        assert_eq!(GeneratorValue::Amount(0x0201).range(), (1, 2));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(GeneratorType::InitialFilterFc.default_amount(), 13500);
        assert_eq!(GeneratorType::AttackVolEnv.default_amount(), -12000);
        assert_eq!(GeneratorType::ScaleTuning.default_amount(), 100);
        assert_eq!(GeneratorType::SustainVolEnv.default_amount(), 0);
    }
}
