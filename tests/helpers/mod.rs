//! Test helpers and fixtures for Soundbank integration tests
//!
//! Banks are written with the decoder's own `test-util` fixture, so tests never
//! depend on bank files checked into the repository.

#![allow(dead_code)]

pub use soundbank_sf2::fixture::{chunk, BankBuilder, ZoneSpec};

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: u32 = 44100;

/// Install a test-friendly `tracing` subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Generate a short ramp that wraps around, so every sample has distinct frames.
pub fn ramp(len: usize) -> Vec<i16> {
    (0..len).map(|i| (i as i16).wrapping_mul(97)).collect()
}

/// A builder whose `INFO` already carries `ifil` version 2.1.
pub fn writer() -> BankBuilder {
    BankBuilder::new().info(b"ifil", &[2, 0, 1, 0])
}

/// One sample, one instrument covering every key, one preset at bank 0 program 0.
pub fn single_sample_bank() -> Vec<u8> {
    writer()
        .text(b"INAM", "Test Bank")
        .tone("Sine", ramp(64))
        .instrument("Sine", vec![ZoneSpec::new().sample(0)])
        .preset("Sine", 0, 0, vec![ZoneSpec::new().instrument(0)])
        .build()
}
