//! Per-key playback parameters and SoundFont unit conversions.

use crate::generator::GeneratorType as G;
use crate::sample::Sample;
use crate::zone::GeneratorMap;
use std::sync::Arc;

/// Samples per coarse address offset step.
pub const COARSE_OFFSET_FRAMES: i32 = 32768;

/// Root key used when a sample is unpitched (original pitch 255) or out of range.
pub const DEFAULT_ROOT_KEY: u8 = 60;

/// Upper bound for `initialFilterQ`, in centibels.
pub const MAX_FILTER_Q_CB: i16 = 960;

/// Frequency of the vibrato LFO at 0 absolute cents.
const LFO_BASE_HZ: f64 = 8.176;

/// Timecents to a time multiplier in seconds (`2^(tc / 1200)`).
pub fn timecents_to_seconds(timecents: i16) -> f64 {
    2f64.powf(f64::from(timecents) / 1200.0)
}

/// Absolute cents to Hz (`440 * 2^((cents - 6900) / 1200)`).
pub fn absolute_cents_to_hz(cents: i16) -> f64 {
    440.0 * 2f64.powf((f64::from(cents) - 6900.0) / 1200.0)
}

/// Clamp a raw `initialFilterQ` amount into `0..=960` centibels.
pub fn sanitize_filter_q(q_cb: i16) -> i16 {
    q_cb.clamp(0, MAX_FILTER_Q_CB)
}

/// Filter resonance in dB for a raw `initialFilterQ` amount, always finite.
pub fn filter_q_db(q_cb: i16) -> f64 {
    f64::from(sanitize_filter_q(q_cb)) / 10.0
}

/// Loop behaviour from `sampleModes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoopMode {
    #[default]
    NoLoop,
    Continuous,
    /// Loop while the key is held, then play to the end
    UntilRelease,
}

impl LoopMode {
    pub fn from_sample_modes(amount: i16) -> Self {
        match amount & 0b11 {
            1 => Self::Continuous,
            3 => Self::UntilRelease,
            _ => Self::NoLoop,
        }
    }
}

/// Envelope stage times (seconds) and sustain fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    pub attack: f64,
    pub decay: f64,
    /// `sustain / 1000`; an approximation of the centibel attenuation law
    pub sustain: f64,
    pub release: f64,
}

impl Envelope {
    fn from_generators(gens: &GeneratorMap, [attack, decay, sustain, release]: [G; 4]) -> Self {
        Self {
            attack: timecents_to_seconds(gens.amount_or_default(attack)),
            decay: timecents_to_seconds(gens.amount_or_default(decay)),
            sustain: f64::from(gens.amount_or_default(sustain)) / 1000.0,
            release: timecents_to_seconds(gens.amount_or_default(release)),
        }
    }
}

/// Raw lowpass filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterParams {
    /// `initialFilterFc`, absolute cents
    pub cutoff: i16,
    /// `modEnvToFilterFc`, cents
    pub env_depth: i16,
    /// `initialFilterQ`, centibels clamped to `0..=960`
    pub resonance: i16,
}

impl FilterParams {
    pub fn cutoff_hz(&self) -> f64 {
        absolute_cents_to_hz(self.cutoff)
    }

    pub fn resonance_db(&self) -> f64 {
        filter_q_db(self.resonance)
    }
}

/// Everything a voice needs to play one key of one preset.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayableKey {
    pub key: u8,
    pub sample_id: usize,
    pub sample: Arc<[i16]>,
    pub sample_rate: u32,
    pub root_key: u8,
    /// Playback speed relative to the sample's own rate
    pub base_playback_rate: f64,
    /// Semitones (`coarseTune + fineTune / 100`)
    pub tune: f64,
    /// `scaleTuning / 100`
    pub scale_tuning: f64,
    /// `modEnvToPitch / 100`
    pub mod_env_to_pitch: f64,
    /// Start trim in frames
    pub start: i32,
    /// End trim in frames
    pub end: i32,
    /// Loop start in frames from the sample's first frame
    pub loop_start: i64,
    /// Loop end in frames from the sample's first frame
    pub loop_end: i64,
    pub loop_mode: LoopMode,
    pub volume_envelope: Envelope,
    pub modulation_envelope: Envelope,
    pub filter: FilterParams,
    /// Vibrato LFO rate in Hz, when set
    pub vibrato_lfo_hz: Option<f64>,
    /// -0.5 (left) to 0.5 (right)
    pub pan: f64,
    pub exclusive_class: u8,
}

impl PlayableKey {
    /// Build the playable parameters of `key` from a merged instrument zone.
    pub fn new(key: u8, sample_id: usize, sample: &Sample, gens: &GeneratorMap) -> Self {
        let root_key = root_key(gens, sample.original_pitch);
        let tune = f64::from(gens.amount_or_default(G::CoarseTune))
            + f64::from(gens.amount_or_default(G::FineTune)) / 100.0;
        let scale_tuning = f64::from(gens.amount_or_default(G::ScaleTuning)) / 100.0;
        let semitones = f64::from(key) - f64::from(root_key)
            + tune
            + f64::from(sample.pitch_correction) / 100.0;

        let vibrato = gens.amount_or_default(G::FreqVibLfo);

        Self {
            key,
            sample_id,
            sample: Arc::clone(&sample.data),
            sample_rate: sample.sample_rate,
            root_key,
            base_playback_rate: 2f64.powf(semitones * scale_tuning / 12.0),
            tune,
            scale_tuning,
            mod_env_to_pitch: f64::from(gens.amount_or_default(G::ModEnvToPitch)) / 100.0,
            start: offset(gens, G::StartAddrsCoarseOffset, G::StartAddrsOffset),
            end: offset(gens, G::EndAddrsCoarseOffset, G::EndAddrsOffset),
            loop_start: sample.loop_start
                + i64::from(offset(gens, G::StartloopAddrsCoarseOffset, G::StartloopAddrsOffset)),
            loop_end: sample.loop_end
                + i64::from(offset(gens, G::EndloopAddrsCoarseOffset, G::EndloopAddrsOffset)),
            loop_mode: LoopMode::from_sample_modes(gens.amount_or_default(G::SampleModes)),
            volume_envelope: Envelope::from_generators(
                gens,
                [G::AttackVolEnv, G::DecayVolEnv, G::SustainVolEnv, G::ReleaseVolEnv],
            ),
            modulation_envelope: Envelope::from_generators(
                gens,
                [G::AttackModEnv, G::DecayModEnv, G::SustainModEnv, G::ReleaseModEnv],
            ),
            filter: FilterParams {
                cutoff: gens.amount_or_default(G::InitialFilterFc),
                env_depth: gens.amount_or_default(G::ModEnvToFilterFc),
                resonance: sanitize_filter_q(gens.amount_or_default(G::InitialFilterQ)),
            },
            vibrato_lfo_hz: (vibrato != 0).then(|| timecents_to_seconds(vibrato) * LFO_BASE_HZ),
            pan: (f64::from(gens.amount_or_default(G::Pan)) / 1000.0).clamp(-0.5, 0.5),
            exclusive_class: gens.amount_or_default(G::ExclusiveClass).clamp(0, 127) as u8,
        }
    }
}

fn offset(gens: &GeneratorMap, coarse: G, fine: G) -> i32 {
    i32::from(gens.amount_or_default(coarse)) * COARSE_OFFSET_FRAMES
        + i32::from(gens.amount_or_default(fine))
}

fn root_key(gens: &GeneratorMap, original_pitch: u8) -> u8 {
    match gens.amount(G::OverridingRootKey) {
        Some(root @ 0..=127) => root as u8,
        _ if original_pitch <= 127 => original_pitch,
        _ => DEFAULT_ROOT_KEY,
    }
}
