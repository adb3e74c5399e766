//! Zone resolution over the flat record arrays.
//!
//! Every header owns the bags from its own bag index up to the next header's
//! bag index (the last header runs to the end of the bag array). Bags own
//! generators and modulators the same way. Resolution is plain integer
//! arithmetic over the decoded arrays: [`bag_ranges`] computes the ranges and
//! [`resolve_zones`] folds each bag's records into a [`Zone`].

use crate::error::Warning;
use crate::generator::{Generator, GeneratorType, GeneratorValue, UnknownGenerator};
use crate::hydra::Bag;
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::warn;

/// Generator values of one zone keyed by type.
///
/// Inserting a type twice keeps the later value. Codes outside the
/// generator table are collected in [`GeneratorMap::unknown`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorMap {
    values: BTreeMap<GeneratorType, GeneratorValue>,
    unknown: Vec<UnknownGenerator>,
}

impl GeneratorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a record sequence in order.
    pub fn from_sequence(records: &[Generator]) -> Self {
        let mut map = Self::new();
        for record in records {
            map.insert(*record);
        }
        map
    }

    pub fn insert(&mut self, record: Generator) {
        match record {
            Generator::Known { kind, value } => {
                self.values.insert(kind, value);
            }
            Generator::Unknown(unknown) => self.unknown.push(unknown),
        }
    }

    pub fn get(&self, kind: GeneratorType) -> Option<GeneratorValue> {
        self.values.get(&kind).copied()
    }

    pub fn contains(&self, kind: GeneratorType) -> bool {
        self.values.contains_key(&kind)
    }

    pub fn amount(&self, kind: GeneratorType) -> Option<i16> {
        self.get(kind).map(GeneratorValue::amount)
    }

    /// Amount of `kind`, or `default` when the zone does not set it.
    pub fn amount_or(&self, kind: GeneratorType, default: i16) -> i16 {
        self.amount(kind).unwrap_or(default)
    }

    /// Amount of `kind`, or its SoundFont default when the zone does not set it.
    pub fn amount_or_default(&self, kind: GeneratorType) -> i16 {
        self.amount_or(kind, kind.default_amount())
    }

    pub fn range(&self, kind: GeneratorType) -> Option<(u8, u8)> {
        self.get(kind).map(GeneratorValue::range)
    }

    /// Records whose code is not in the generator table, in file order.
    pub fn unknown(&self) -> &[UnknownGenerator] {
        &self.unknown
    }

    /// Known generators in code order.
    pub fn iter(&self) -> impl Iterator<Item = (GeneratorType, GeneratorValue)> + '_ {
        self.values.iter().map(|(kind, value)| (*kind, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.unknown.is_empty()
    }

    /// Copy of this map with `defaults` filled in underneath.
    ///
    /// A type this map already sets keeps its own value; a type only
    /// `defaults` sets is added. Unknown records are not inherited.
    pub fn with_defaults(&self, defaults: &GeneratorMap) -> GeneratorMap {
        let mut merged = self.clone();
        for (kind, value) in defaults.iter() {
            merged.values.entry(kind).or_insert(value);
        }
        merged
    }
}

/// One resolved preset or instrument zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Zone {
    pub generators: GeneratorMap,
    /// Generator records as they appear in the file
    pub generator_sequence: Vec<Generator>,
    pub modulators: GeneratorMap,
    /// Modulator destinations as they appear in the file
    pub modulator_sequence: Vec<Generator>,
}

impl Zone {
    pub fn from_records(generators: &[Generator], modulators: &[Generator]) -> Self {
        Self {
            generators: GeneratorMap::from_sequence(generators),
            generator_sequence: generators.to_vec(),
            modulators: GeneratorMap::from_sequence(modulators),
            modulator_sequence: modulators.to_vec(),
        }
    }
}

/// Which side of the hydra a zone list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneLevel {
    Preset,
    Instrument,
}

impl ZoneLevel {
    /// Generator that links a local zone to the level below.
    pub fn terminal_generator(self) -> GeneratorType {
        match self {
            Self::Preset => GeneratorType::Instrument,
            Self::Instrument => GeneratorType::SampleId,
        }
    }

    fn labels(self) -> [&'static str; 3] {
        match self {
            Self::Preset => ["phdr", "pbag/pgen", "pbag/pmod"],
            Self::Instrument => ["inst", "ibag/igen", "ibag/imod"],
        }
    }
}

/// Half-open ranges `[starts[i], starts[i + 1])`, the last ending at `total`.
///
/// Decreasing indices produce an empty range and indices past `total` are
/// clamped, so the result can always be used to slice an array of `total`
/// elements.
pub fn bag_ranges(starts: &[usize], total: usize) -> Vec<Range<usize>> {
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(total).min(total);
            start.min(end)..end
        })
        .collect()
}

/// Entries of `starts` whose raw range is decreasing or runs past `total`.
pub fn invalid_ranges(starts: &[usize], total: usize) -> Vec<(usize, Range<usize>)> {
    starts
        .iter()
        .enumerate()
        .filter_map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(total);
            (start > end || end > total).then_some((i, start..end))
        })
        .collect()
}

fn report_invalid(
    list: &'static str,
    starts: &[usize],
    total: usize,
    warnings: &mut Vec<Warning>,
) {
    for (index, range) in invalid_ranges(starts, total) {
        let warning = Warning::InvalidBagRange {
            list,
            index,
            start: range.start,
            end: range.end,
            total,
        };
        warn!("{}", warning);
        warnings.push(warning);
    }
}

/// Resolve the zones of every header, terminal header included.
///
/// `header_bags` holds each header's bag index. The result has one zone list
/// per header, in header order.
pub fn resolve_zones(
    level: ZoneLevel,
    header_bags: &[usize],
    bags: &[Bag],
    generators: &[Generator],
    modulators: &[Generator],
    warnings: &mut Vec<Warning>,
) -> Vec<Vec<Zone>> {
    let [header_label, generator_label, modulator_label] = level.labels();

    let generator_starts: Vec<usize> = bags.iter().map(|b| b.generator_index as usize).collect();
    let modulator_starts: Vec<usize> = bags.iter().map(|b| b.modulator_index as usize).collect();

    report_invalid(header_label, header_bags, bags.len(), warnings);
    report_invalid(generator_label, &generator_starts, generators.len(), warnings);
    report_invalid(modulator_label, &modulator_starts, modulators.len(), warnings);

    let generator_ranges = bag_ranges(&generator_starts, generators.len());
    let modulator_ranges = bag_ranges(&modulator_starts, modulators.len());

    bag_ranges(header_bags, bags.len())
        .into_iter()
        .map(|bag_range| {
            bag_range
                .map(|bag| {
                    Zone::from_records(
                        &generators[generator_ranges[bag].clone()],
                        &modulators[modulator_ranges[bag].clone()],
                    )
                })
                .collect()
        })
        .collect()
}

/// Split off the global zone, if the list has one.
///
/// The first zone is global when it lacks the level's terminal generator.
/// Only the first zone can be global; a later zone without the terminal
/// generator is simply not playable.
pub fn split_global(zones: &[Zone], level: ZoneLevel) -> (Option<&Zone>, &[Zone]) {
    match zones.split_first() {
        Some((first, rest)) if !first.generators.contains(level.terminal_generator()) => {
            (Some(first), rest)
        }
        _ => (None, zones),
    }
}
