//! Spectrum analyser configuration.

use crate::error::{Result, WallError};

/// Analyser configuration, modelled on the browser analyser node
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// Transform size in samples (must be a power of 2)
    /// 128 gives 64 frequency bins
    pub fft_size: usize,

    /// Time smoothing between consecutive snapshots (0 = none, <1)
    pub smoothing: f32,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_db: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_db: f32,

    /// Fallback sample rate when the device does not report one (Hz)
    pub sample_rate_hz: u32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 128,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
            sample_rate_hz: 44100,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins produced per snapshot
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Width of a single bin in Hz at the given sample rate
    pub fn bin_width_hz(&self, sample_rate_hz: u32) -> f32 {
        sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<()> {
        if self.fft_size < 32 || !self.fft_size.is_power_of_two() {
            return Err(WallError::InvalidConfig(format!(
                "FFT size must be a power of 2 >= 32, got {}",
                self.fft_size
            )));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(WallError::InvalidConfig(format!(
                "smoothing must be in [0, 1), got {}",
                self.smoothing
            )));
        }
        if self.min_db >= self.max_db {
            return Err(WallError::InvalidConfig(format!(
                "min_db ({}) must be below max_db ({})",
                self.min_db, self.max_db
            )));
        }
        if self.sample_rate_hz == 0 {
            return Err(WallError::InvalidConfig(
                "sample rate must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_64_bins() {
        let config = AnalyserConfig::default();
        assert_eq!(config.bin_count(), 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bin_width() {
        let config = AnalyserConfig::default();
        // 44100 / 128 ≈ 344.5 Hz per bin
        assert!((config.bin_width_hz(44100) - 344.53).abs() < 0.01);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AnalyserConfig {
            fft_size: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.fft_size = 128;
        config.smoothing = 1.0;
        assert!(config.validate().is_err());

        config.smoothing = 0.5;
        config.min_db = -20.0;
        assert!(config.validate().is_err());
    }
}
