//! Parsed sound bank: resolved presets, instruments and samples plus the
//! flattened per-key lookup table.

use crate::bank::BankSet;
use crate::config::DecoderConfig;
use crate::error::{Result, Warning};
use crate::generator::GeneratorType;
use crate::hydra::{Hydra, PresetHeader};
use crate::info::BankInfo;
use crate::playable::PlayableKey;
use crate::sample::{extract_samples, Sample};
use crate::structure::Layout;
use crate::zone::{resolve_zones, split_global, GeneratorMap, Zone, ZoneLevel};
use tracing::{debug, warn};

/// A preset with its zones resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: String,
    pub header: PresetHeader,
    /// Zones in file order, global zone first when present
    pub zones: Vec<Zone>,
    /// Instrument referenced by the last local zone that names one
    pub instrument: Option<usize>,
}

impl Preset {
    pub fn bank(&self) -> u16 {
        self.header.bank
    }

    pub fn number(&self) -> u16 {
        self.header.preset
    }

    pub fn global_zone(&self) -> Option<&Zone> {
        split_global(&self.zones, ZoneLevel::Preset).0
    }

    pub fn local_zones(&self) -> &[Zone] {
        split_global(&self.zones, ZoneLevel::Preset).1
    }
}

/// An instrument with its zones resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub name: String,
    /// Zones in file order, global zone first when present
    pub zones: Vec<Zone>,
}

impl Instrument {
    pub fn global_zone(&self) -> Option<&Zone> {
        split_global(&self.zones, ZoneLevel::Instrument).0
    }

    pub fn local_zones(&self) -> &[Zone] {
        split_global(&self.zones, ZoneLevel::Instrument).1
    }
}

/// A fully decoded SoundFont.
///
/// Immutable once built. Reloading means parsing a new buffer into a new
/// `SoundBank`; sample data is reference counted, so keys handed out from an
/// old bank stay playable.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundBank {
    info: BankInfo,
    presets: Vec<Preset>,
    instruments: Vec<Instrument>,
    samples: Vec<Sample>,
    bank_set: BankSet,
    warnings: Vec<Warning>,
}

impl SoundBank {
    /// Parse a complete `.sf2` file with the default configuration.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with_config(data, &DecoderConfig::default())
    }

    /// Parse a complete `.sf2` file.
    ///
    /// Structural problems abort with an error. Problems confined to single
    /// keys, zones or samples are skipped and reported by [`SoundBank::warnings`].
    pub fn parse_with_config(data: &[u8], config: &DecoderConfig) -> Result<Self> {
        let layout = Layout::locate(data)?;
        let info = BankInfo::from_chunks(data, &layout.info);
        let hydra = Hydra::decode(data, &layout.pdta)?;

        let mut warnings = Vec::new();
        for tag in hydra.missing_terminals() {
            let warning = Warning::MissingTerminalRecord { tag };
            warn!("{}", warning);
            warnings.push(warning);
        }

        let samples = extract_samples(
            &hydra.sample_headers,
            layout.smpl.payload(data),
            config,
            &mut warnings,
        );
        let instruments = resolve_instruments(&hydra, &mut warnings);
        let presets = resolve_presets(&hydra, &mut warnings);
        let bank_set = flatten(&presets, &instruments, &samples, config, &mut warnings);

        debug!(
            "Loaded SoundFont {:?}: {} presets, {} instruments, {} samples, {} keys, {} warnings",
            info.name.as_deref().unwrap_or(""),
            presets.len(),
            instruments.len(),
            samples.len(),
            bank_set.key_count(),
            warnings.len()
        );

        Ok(Self {
            info,
            presets,
            instruments,
            samples,
            bank_set,
            warnings,
        })
    }

    pub fn info(&self) -> &BankInfo {
        &self.info
    }

    /// Presets in file order, terminal record excluded.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Instruments in file order, terminal record excluded.
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Samples in file order, terminal record excluded.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn bank_set(&self) -> &BankSet {
        &self.bank_set
    }

    /// Shorthand for `bank_set().get(bank, preset, key)`.
    pub fn key(&self, bank: u16, preset: u16, key: u8) -> Option<&PlayableKey> {
        self.bank_set.get(bank, preset, key)
    }

    /// Problems recovered from during the load.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

fn resolve_instruments(hydra: &Hydra, warnings: &mut Vec<Warning>) -> Vec<Instrument> {
    let starts: Vec<usize> = hydra
        .instrument_headers
        .iter()
        .map(|h| h.instrument_bag_index as usize)
        .collect();
    let zones = resolve_zones(
        ZoneLevel::Instrument,
        &starts,
        &hydra.instrument_bags,
        &hydra.instrument_generators,
        &hydra.instrument_modulators,
        warnings,
    );

    let live = hydra.instrument_headers.len().saturating_sub(1);
    hydra.instrument_headers[..live]
        .iter()
        .zip(zones)
        .map(|(header, zones)| Instrument {
            name: header.name.clone(),
            zones,
        })
        .collect()
}

fn resolve_presets(hydra: &Hydra, warnings: &mut Vec<Warning>) -> Vec<Preset> {
    let starts: Vec<usize> = hydra
        .preset_headers
        .iter()
        .map(|h| h.preset_bag_index as usize)
        .collect();
    let zones = resolve_zones(
        ZoneLevel::Preset,
        &starts,
        &hydra.preset_bags,
        &hydra.preset_generators,
        &hydra.preset_modulators,
        warnings,
    );

    let live = hydra.preset_headers.len().saturating_sub(1);
    hydra.preset_headers[..live]
        .iter()
        .zip(zones)
        .map(|(header, zones)| {
            let instrument = split_global(&zones, ZoneLevel::Preset)
                .1
                .iter()
                .rev()
                .find_map(|zone| zone.generators.amount(GeneratorType::Instrument))
                .map(|amount| amount as u16 as usize);
            Preset {
                name: header.name.clone(),
                header: header.clone(),
                zones,
                instrument,
            }
        })
        .collect()
}

/// Full key range a zone covers when it has no `keyRange`.
const FULL_RANGE: (u8, u8) = (0, 127);

fn key_range(gens: &GeneratorMap) -> (u8, u8) {
    gens.range(GeneratorType::KeyRange).unwrap_or(FULL_RANGE)
}

fn zone_generators(zone: &Zone, global: Option<&Zone>, config: &DecoderConfig) -> GeneratorMap {
    // Global values are defaults: a generator the local zone sets itself wins.
    match global {
        Some(global) if config.apply_global_zones => {
            zone.generators.with_defaults(&global.generators)
        }
        _ => zone.generators.clone(),
    }
}

/// Build the `bank -> preset -> key` table.
///
/// Presets are visited in file order, then their local zones in order, then
/// the referenced instrument's local zones in order. The first zone to claim
/// a key keeps it. A preset header whose bank and number repeat an earlier
/// one starts over with an empty entry. A key is claimed only inside both the preset zone's and the
/// instrument zone's key ranges.
fn flatten(
    presets: &[Preset],
    instruments: &[Instrument],
    samples: &[Sample],
    config: &DecoderConfig,
    warnings: &mut Vec<Warning>,
) -> BankSet {
    let mut bank_set = BankSet::new();

    for preset in presets {
        let entry = bank_set.reset_preset(preset.bank(), preset.number(), &preset.name);
        let (preset_global, preset_zones) = split_global(&preset.zones, ZoneLevel::Preset);

        for preset_zone in preset_zones {
            let preset_gens = zone_generators(preset_zone, preset_global, config);
            let Some(instrument_id) = preset_gens.amount(GeneratorType::Instrument) else {
                continue;
            };
            let instrument_id = instrument_id as u16;
            let Some(instrument) = instruments.get(instrument_id as usize) else {
                let warning = Warning::MissingInstrumentReference {
                    bank: preset.bank(),
                    preset: preset.number(),
                    instrument: instrument_id,
                    instrument_count: instruments.len(),
                };
                warn!("{}", warning);
                warnings.push(warning);
                continue;
            };

            let (preset_lo, preset_hi) = key_range(&preset_gens);
            let (instrument_global, instrument_zones) =
                split_global(&instrument.zones, ZoneLevel::Instrument);
            let zone_offset = usize::from(instrument_global.is_some());

            for (zone_index, zone) in instrument_zones.iter().enumerate() {
                let gens = zone_generators(zone, instrument_global, config);
                let Some(sample_id) = gens.amount(GeneratorType::SampleId) else {
                    continue;
                };
                let sample_id = sample_id as u16;
                let Some(sample) = samples.get(sample_id as usize) else {
                    let warning = Warning::MissingSampleReference {
                        instrument: instrument_id as usize,
                        zone: zone_index + zone_offset,
                        sample_id,
                        sample_count: samples.len(),
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                    continue;
                };

                let (lo, hi) = key_range(&gens);
                let lo = lo.max(preset_lo);
                let hi = hi.min(preset_hi).min(127);
                for key in lo..=hi {
                    if !entry.contains(key) {
                        entry.insert_if_absent(PlayableKey::new(
                            key,
                            sample_id as usize,
                            sample,
                            &gens,
                        ));
                    }
                }
            }
        }
    }

    bank_set
}
