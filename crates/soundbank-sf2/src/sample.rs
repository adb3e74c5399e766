//! Sample extraction from `smpl` and sample-rate normalization.

use crate::config::DecoderConfig;
use crate::error::Warning;
use crate::hydra::SampleHeader;
use std::sync::Arc;
use tracing::warn;

/// Channel role of a sample (`sfSampleType` without the ROM bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleKind {
    Mono,
    Right,
    Left,
    Linked,
    Other(u16),
}

/// Decoded `sfSampleType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleType {
    pub kind: SampleKind,
    /// Sample data lives in a sound ROM rather than in `smpl`
    pub rom: bool,
}

const ROM_FLAG: u16 = 0x8000;

impl SampleType {
    pub fn from_raw(raw: u16) -> Self {
        let kind = match raw & !ROM_FLAG {
            1 => SampleKind::Mono,
            2 => SampleKind::Right,
            4 => SampleKind::Left,
            8 => SampleKind::Linked,
            other => SampleKind::Other(other),
        };
        Self {
            kind,
            rom: raw & ROM_FLAG != 0,
        }
    }

    pub fn raw(self) -> u16 {
        let base = match self.kind {
            SampleKind::Mono => 1,
            SampleKind::Right => 2,
            SampleKind::Left => 4,
            SampleKind::Linked => 8,
            SampleKind::Other(other) => other,
        };
        if self.rom {
            base | ROM_FLAG
        } else {
            base
        }
    }
}

/// An extracted sample with loop points relative to its own first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    /// Mono PCM frames, shared with every key that plays this sample
    pub data: Arc<[i16]>,
    /// Rate after normalization
    pub sample_rate: u32,
    pub loop_start: i64,
    pub loop_end: i64,
    pub original_pitch: u8,
    pub pitch_correction: i8,
    pub sample_link: u16,
    pub sample_type: SampleType,
    /// Power-of-two factor applied by normalization (1 when untouched)
    pub upsample_factor: u32,
}

/// Duplicate every frame until `rate` reaches `min_rate`.
///
/// This is a lossy, non-bandlimited transform kept for playback engines
/// that assume a minimum rate; it is not resampling. Returns the new frames,
/// the new rate and the factor applied. A rate of 0 is returned untouched.
///
/// Output grows with `min_rate / rate` and only `min_rate` bounds it: with the
/// default floor a 1 Hz header yields 32768 copies of every frame, 64 KiB of
/// PCM per source frame. Lower [`DecoderConfig::min_sample_rate`] or set it to
/// 0 when decoding untrusted banks with implausible rates.
pub fn normalize_rate(mut frames: Vec<i16>, mut rate: u32, min_rate: u32) -> (Vec<i16>, u32, u32) {
    let mut factor = 1u32;
    if rate == 0 {
        return (frames, rate, factor);
    }

    while rate < min_rate {
        frames = frames.iter().flat_map(|&frame| [frame, frame]).collect();
        rate = rate.saturating_mul(2);
        factor = factor.saturating_mul(2);
    }

    (frames, rate, factor)
}

/// Slice every non-terminal sample header out of the `smpl` blob.
///
/// Headers pointing past the blob are clamped to it and reported.
pub fn extract_samples(
    headers: &[SampleHeader],
    smpl: &[u8],
    config: &DecoderConfig,
    warnings: &mut Vec<Warning>,
) -> Vec<Sample> {
    let available = smpl.len() / 2;
    let live = headers.len().saturating_sub(1);

    headers[..live]
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let end = (header.end as usize).min(available);
            let start = (header.start as usize).min(end);
            if start != header.start as usize || end != header.end as usize {
                let warning = Warning::SampleOutOfBounds {
                    sample: index,
                    start: header.start,
                    end: header.end,
                    available,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }

            let frames: Vec<i16> = smpl[start * 2..end * 2]
                .chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]]))
                .collect();

            let loop_start = header.start_loop as i64 - start as i64;
            let loop_end = header.end_loop as i64 - start as i64;

            if header.sample_rate == 0 {
                let warning = Warning::ZeroSampleRate { sample: index };
                warn!("{}", warning);
                warnings.push(warning);
            }
            let (frames, sample_rate, factor) =
                normalize_rate(frames, header.sample_rate, config.min_sample_rate);

            Sample {
                name: header.name.clone(),
                data: frames.into(),
                sample_rate,
                loop_start: loop_start * factor as i64,
                loop_end: loop_end * factor as i64,
                original_pitch: header.original_pitch,
                pitch_correction: header.pitch_correction,
                sample_link: header.sample_link,
                sample_type: SampleType::from_raw(header.sample_type),
                upsample_factor: factor,
            }
        })
        .collect()
}
