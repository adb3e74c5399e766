//! Decoder configuration.

/// Minimum playback sample rate samples are normalized to.
pub const DEFAULT_MIN_SAMPLE_RATE: u32 = 22050;

/// Options applied while turning a parsed bank into playable keys.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Samples below this rate are upsampled by frame duplication (default: 22050).
    ///
    /// This is the only limit on upsampled size, see
    /// [`normalize_rate`](crate::sample::normalize_rate).
    pub min_sample_rate: u32,
    /// Merge global zone values underneath local zones (default: true)
    pub apply_global_zones: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            min_sample_rate: DEFAULT_MIN_SAMPLE_RATE,
            apply_global_zones: true,
        }
    }
}

impl DecoderConfig {
    /// Set the rate below which samples are upsampled. `0` disables upsampling.
    pub fn with_min_sample_rate(mut self, rate: u32) -> Self {
        self.min_sample_rate = rate;
        self
    }

    /// Enable or disable global zone merging.
    pub fn with_global_zones(mut self, apply: bool) -> Self {
        self.apply_global_zones = apply;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecoderConfig::default();
        assert_eq!(config.min_sample_rate, 22050);
        assert!(config.apply_global_zones);
    }

    #[test]
    fn test_builders() {
        let config = DecoderConfig::default()
            .with_min_sample_rate(44100)
            .with_global_zones(false);
        assert_eq!(config.min_sample_rate, 44100);
        assert!(!config.apply_global_zones);
    }
}
