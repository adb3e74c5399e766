//! End-to-end decode tests
//!
//! Every bank here is written by the shared `BankBuilder` fixture and decoded through
//! the umbrella crate.
//!
//! Run with:
//! ```bash
//! cargo test -p soundbank --test decode_tests
//! ```

mod helpers;

use approx::assert_relative_eq;
use helpers::{init_tracing, ramp, single_sample_bank, writer, BankBuilder, ZoneSpec};
use soundbank::prelude::*;
use soundbank::sf2::Error as DecodeError;
use soundbank::{GeneratorType as G, PERCUSSION_BANK};

fn four_samples() -> BankBuilder {
    (0..4).fold(writer(), |bank, i| bank.tone(&format!("S{i}"), ramp(32 + i * 8)))
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn test_info_fields() {
    init_tracing();
    let data = writer()
        .text(b"INAM", "General User")
        .text(b"ICOP", "Free")
        .text(b"isng", "EMU8000")
        .build();

    let bank = soundbank::parse(&data).unwrap();
    let info = bank.info();
    assert_eq!(info.name.as_deref(), Some("General User"));
    assert_eq!(info.copyright.as_deref(), Some("Free"));
    assert_eq!(info.sound_engine.as_deref(), Some("EMU8000"));
    assert_eq!(info.version.map(|v| (v.major, v.minor)), Some((2, 1)));
}

#[test]
fn test_odd_length_info_chunk_is_padded() {
    // "Abcd" + NUL is five bytes; the following chunk must still be found
    let data = writer()
        .text(b"INAM", "Abcd")
        .text(b"IENG", "Someone")
        .build();

    let bank = soundbank::parse(&data).unwrap();
    assert_eq!(bank.info().name.as_deref(), Some("Abcd"));
    assert_eq!(bank.info().engineers.as_deref(), Some("Someone"));
}

#[test]
fn test_eight_pdta_chunks_is_structural_error() {
    let data = writer().drop_pdta_chunk(b"imod").build();

    match soundbank::parse(&data) {
        Err(Error::Decode(DecodeError::UnexpectedChunkCount {
            expected, found, ..
        })) => {
            assert_eq!(expected, 9);
            assert_eq!(found, 8);
        }
        other => panic!("expected UnexpectedChunkCount, got {other:?}"),
    }
}

#[test]
fn test_truncated_file_is_error() {
    let data = single_sample_bank();
    let cut = &data[..data.len() - 20];
    assert!(soundbank::parse(cut).is_err());
}

#[test]
fn test_wrong_form_type_is_error() {
    let mut data = single_sample_bank();
    data[8..12].copy_from_slice(b"WAVE");
    assert!(matches!(
        soundbank::parse(&data),
        Err(Error::Decode(DecodeError::UnexpectedChunkTag { .. }))
    ));
}

// =============================================================================
// Flattening
// =============================================================================

#[test]
fn test_key_range_selects_exactly_those_keys() {
    init_tracing();
    let data = four_samples()
        .instrument("Lead", vec![ZoneSpec::new().keys(60, 67).sample(3)])
        .preset("Lead", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .build();

    let bank = soundbank::parse(&data).unwrap();
    let keys = bank.bank_set().preset(0, 0).unwrap();

    assert_eq!(keys.len(), 8);
    assert!(keys.iter().all(|key| key.sample_id == 3));
    assert!((60..=67).all(|key| keys.contains(key)));
    assert!(!keys.contains(59));
    assert!(!keys.contains(68));
    assert_eq!(keys.get(64).unwrap().sample.len(), bank.samples()[3].data.len());
}

#[test]
fn test_split_instrument() {
    let data = four_samples()
        .instrument(
            "Split",
            vec![
                ZoneSpec::new().keys(0, 59).sample(0),
                ZoneSpec::new().keys(60, 127).sample(1),
            ],
        )
        .preset("Split", 0, 4, vec![ZoneSpec::new().instrument(0)])
        .build();

    let bank = soundbank::parse(&data).unwrap();
    assert_eq!(bank.key(0, 4, 59).unwrap().sample_id, 0);
    assert_eq!(bank.key(0, 4, 60).unwrap().sample_id, 1);
    assert_eq!(bank.bank_set().preset(0, 4).unwrap().len(), 128);
}

#[test]
fn test_layered_preset_zones_first_wins() {
    let data = four_samples()
        .instrument("A", vec![ZoneSpec::new().sample(0)])
        .instrument("B", vec![ZoneSpec::new().sample(2)])
        .preset(
            "Layered",
            0,
            1,
            vec![
                ZoneSpec::new().keys(0, 63).instrument(0),
                ZoneSpec::new().instrument(1),
            ],
        )
        .build();

    let bank = soundbank::parse(&data).unwrap();
    assert_eq!(bank.key(0, 1, 10).unwrap().sample_id, 0);
    assert_eq!(bank.key(0, 1, 63).unwrap().sample_id, 0);
    assert_eq!(bank.key(0, 1, 64).unwrap().sample_id, 2);
}

#[test]
fn test_percussion_bank() {
    let data = four_samples()
        .instrument("Kick", vec![ZoneSpec::new().keys(36, 36).sample(1)])
        .preset("Standard", PERCUSSION_BANK, 0, vec![ZoneSpec::new().instrument(0)])
        .build();

    let bank = soundbank::parse(&data).unwrap();
    assert!(bank.key(0, 0, 36).is_none());
    assert_eq!(bank.key(PERCUSSION_BANK, 0, 36).unwrap().sample_id, 1);
    assert_eq!(bank.bank_set().banks().collect::<Vec<_>>(), vec![PERCUSSION_BANK]);
}

#[test]
fn test_global_instrument_zone_supplies_defaults() {
    let data = four_samples()
        .instrument(
            "Pad",
            vec![
                ZoneSpec::new()
                    .amount(G::AttackVolEnv, -1200)
                    .amount(G::ReleaseVolEnv, 1200),
                ZoneSpec::new().keys(0, 63).sample(0),
                ZoneSpec::new()
                    .keys(64, 127)
                    .amount(G::AttackVolEnv, 0)
                    .sample(1),
            ],
        )
        .preset("Pad", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .build();

    let bank = soundbank::parse(&data).unwrap();
    let low = bank.key(0, 0, 40).unwrap();
    let high = bank.key(0, 0, 80).unwrap();
    assert_relative_eq!(low.volume_envelope.attack, 0.5);
    assert_relative_eq!(low.volume_envelope.release, 2.0);
    assert_relative_eq!(high.volume_envelope.attack, 1.0);
    assert_relative_eq!(high.volume_envelope.release, 2.0);

    let config = DecoderConfig::default().with_global_zones(false);
    let plain = SoundBank::parse_with_config(&data, &config).unwrap();
    assert_relative_eq!(
        plain.key(0, 0, 40).unwrap().volume_envelope.attack,
        2f64.powf(-10.0)
    );
}

#[test]
fn test_pitch_and_tuning() {
    let data = writer()
        .tone("A440", ramp(64))
        .pitch(69, 0)
        .instrument(
            "Tuned",
            vec![ZoneSpec::new()
                .amount(G::CoarseTune, 12)
                .amount(G::FineTune, -50)
                .sample(0)],
        )
        .preset("Tuned", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .build();

    let bank = soundbank::parse(&data).unwrap();
    let key = bank.key(0, 0, 69).unwrap();
    assert_eq!(key.root_key, 69);
    assert_relative_eq!(key.tune, 11.5);
    assert_relative_eq!(key.base_playback_rate, 2f64.powf(11.5 / 12.0), epsilon = 1e-12);
}

#[test]
fn test_loop_mode_and_offsets() {
    let data = writer()
        .tone("Loop", ramp(100))
        .loops(10, 90)
        .instrument(
            "Loop",
            vec![ZoneSpec::new()
                .amount(G::SampleModes, 1)
                .amount(G::StartloopAddrsOffset, 5)
                .amount(G::EndAddrsCoarseOffset, -1)
                .sample(0)],
        )
        .preset("Loop", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .build();

    let bank = soundbank::parse(&data).unwrap();
    let key = bank.key(0, 0, 60).unwrap();
    assert_eq!(key.loop_mode, LoopMode::Continuous);
    assert_eq!((key.loop_start, key.loop_end), (15, 90));
    assert_eq!(key.end, -32768);
}

#[test]
fn test_modulators_decode_without_changing_keys() {
    let with_mods = four_samples()
        .instrument(
            "Mod",
            vec![ZoneSpec::new()
                .modulator(G::InitialFilterFc.code(), -2400)
                .sample(0)],
        )
        .preset("Mod", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .build();
    let without = four_samples()
        .instrument("Mod", vec![ZoneSpec::new().sample(0)])
        .preset("Mod", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .build();

    let a = soundbank::parse(&with_mods).unwrap();
    let b = soundbank::parse(&without).unwrap();
    let zone = &a.instruments()[0].zones[0];
    assert_eq!(zone.modulators.amount(G::InitialFilterFc), Some(-2400));
    assert_eq!(a.bank_set(), b.bank_set());
}

// =============================================================================
// Recovery
// =============================================================================

#[test]
fn test_unknown_generator_codes_preserved() {
    init_tracing();
    let data = four_samples()
        .instrument(
            "Odd",
            vec![ZoneSpec::new()
                .raw(14, 7)
                .raw(49, -3)
                .raw(55, 1000)
                .sample(2)],
        )
        .preset("Odd", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .build();

    let bank = soundbank::parse(&data).unwrap();
    let zone = &bank.instruments()[0].zones[0];
    let codes: Vec<(u16, i16)> = zone
        .generators
        .unknown()
        .iter()
        .map(|g| (g.code, g.amount))
        .collect();
    assert_eq!(codes, vec![(14, 7), (49, -3), (55, 1000)]);
    assert_eq!(bank.key(0, 0, 60).unwrap().sample_id, 2);
    assert!(bank.warnings().is_empty());
}

#[test]
fn test_filter_q_extremes_stay_finite() {
    for q in [i16::MIN, -1, 0, 960, 961, i16::MAX] {
        let data = four_samples()
            .instrument(
                "Q",
                vec![ZoneSpec::new().amount(G::InitialFilterQ, q).sample(0)],
            )
            .preset("Q", 0, 0, vec![ZoneSpec::new().instrument(0)])
            .build();

        let bank = soundbank::parse(&data).unwrap();
        let filter = bank.key(0, 0, 60).unwrap().filter;
        let db = filter.resonance_db();
        assert!(db.is_finite(), "q={q} gave {db}");
        assert!((0.0..=96.0).contains(&db), "q={q} gave {db}");
        assert!(filter.cutoff_hz().is_finite());
    }
}

#[test]
fn test_missing_sample_reference_skips_zone() {
    let data = four_samples()
        .instrument(
            "Broken",
            vec![
                ZoneSpec::new().keys(0, 63).sample(40),
                ZoneSpec::new().sample(1),
            ],
        )
        .preset("Broken", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .build();

    let bank = soundbank::parse(&data).unwrap();
    assert_eq!(bank.key(0, 0, 10).unwrap().sample_id, 1);
    assert!(bank.warnings().iter().any(|w| matches!(
        w,
        Warning::MissingSampleReference { sample_id: 40, .. }
    )));
}

#[test]
fn test_sample_past_smpl_is_clamped() {
    let mut data = single_sample_bank();
    // Point the first sample header's end past the 64-frame blob
    let shdr = data
        .windows(4)
        .position(|w| w == b"shdr")
        .expect("shdr chunk");
    let end_field = shdr + 8 + 20 + 4;
    data[end_field..end_field + 4].copy_from_slice(&1000u32.to_le_bytes());

    let bank = soundbank::parse(&data).unwrap();
    assert_eq!(bank.samples()[0].data.len(), 64);
    assert!(bank
        .warnings()
        .iter()
        .any(|w| matches!(w, Warning::SampleOutOfBounds { sample: 0, end: 1000, .. })));
}

// =============================================================================
// Reload
// =============================================================================

#[test]
fn test_parse_is_idempotent() {
    let data = four_samples()
        .instrument(
            "Multi",
            vec![
                ZoneSpec::new().amount(G::Pan, 250),
                ZoneSpec::new().keys(0, 40).sample(0),
                ZoneSpec::new().keys(41, 90).sample(1),
                ZoneSpec::new().keys(91, 127).sample(3),
            ],
        )
        .preset("Multi", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .preset(
            "Multi Drums",
            PERCUSSION_BANK,
            0,
            vec![ZoneSpec::new().keys(35, 50).instrument(0)],
        )
        .build();

    let first = soundbank::parse(&data).unwrap();
    let second = soundbank::parse(&data).unwrap();
    assert_eq!(first.bank_set(), second.bank_set());
    assert_eq!(first, second);
}

#[test]
fn test_old_keys_survive_new_bank() {
    let old = soundbank::parse(&single_sample_bank()).unwrap();
    let held = old.key(0, 0, 60).unwrap().clone();
    drop(old);

    let new = soundbank::parse(&writer().build()).unwrap();
    assert!(new.bank_set().is_empty());
    assert_eq!(held.sample.len(), 64);
}
