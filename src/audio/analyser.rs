//! Byte-magnitude spectrum analyser.
//!
//! Mirrors the browser analyser node: Blackman window, forward FFT,
//! exponential smoothing across snapshots, dB scaling onto 0..=255.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::Result;
use crate::params::AnalyserConfig;

/// Pull-based analyser producing one byte per frequency bin
pub struct Analyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl Analyser {
    pub fn new(config: AnalyserConfig) -> Result<Self> {
        config.validate()?;

        let n = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        let window = (0..n).map(|i| blackman_window(i, n)).collect();

        Ok(Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); n],
            smoothed: vec![0.0; config.bin_count()],
            config,
        })
    }

    pub fn bin_count(&self) -> usize {
        self.config.bin_count()
    }

    /// Analyse `fft_size` time-domain samples (oldest first) into `out`.
    ///
    /// `out` is resized to `bin_count`. Shorter input is zero-padded at the front.
    pub fn byte_frequency_data(&mut self, samples: &[f32], out: &mut Vec<u8>) {
        let n = self.config.fft_size;
        let pad = n.saturating_sub(samples.len());
        let recent = &samples[samples.len().saturating_sub(n)..];

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let tau = self.config.smoothing;
        let scale = 1.0 / n as f32;
        let db_range = self.config.max_db - self.config.min_db;

        out.clear();
        out.reserve(self.smoothed.len());
        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.buffer[k].norm() * scale;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
            if !smoothed.is_finite() {
                *smoothed = 0.0;
            }
            out.push(to_byte(*smoothed, self.config.min_db, db_range));
        }
    }

    /// Forget smoothing history (used when a new source starts)
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }
}

fn to_byte(magnitude: f32, min_db: f32, db_range: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = (255.0 / db_range) * (db - min_db);
    if scaled.is_nan() {
        0
    } else {
        scaled.floor().clamp(0.0, 255.0) as u8
    }
}

/// Blackman window (alpha = 0.16) for FFT analysis
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = index as f32 / size as f32;
    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsmoothed() -> AnalyserConfig {
        AnalyserConfig {
            smoothing: 0.0,
            min_db: -100.0,
            max_db: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_blackman_window() {
        let size = 128;

        // Blackman window is 0 at the start, 1 at center
        assert!(blackman_window(0, size).abs() < 1e-6);
        assert!((blackman_window(size / 2, size) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_silence_is_all_zero() {
        let mut analyser = Analyser::new(AnalyserConfig::default()).unwrap();
        let mut out = Vec::new();
        analyser.byte_frequency_data(&[0.0; 128], &mut out);
        assert_eq!(out.len(), 64);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_peaks_in_its_bin() {
        let config = unsmoothed();
        let rate = config.sample_rate_hz as f32;
        let freq = config.bin_width_hz(config.sample_rate_hz) * 8.0;
        let samples: Vec<f32> = (0..config.fft_size)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / rate).sin())
            .collect();

        let mut analyser = Analyser::new(config).unwrap();
        let mut out = Vec::new();
        analyser.byte_frequency_data(&samples, &mut out);

        let peak = out
            .iter()
            .enumerate()
            .max_by_key(|(_, &b)| b)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 8);
        assert!(out[8] > out[7]);
        assert!(out[8] > out[9]);
    }

    #[test]
    fn test_smoothing_carries_history() {
        let config = AnalyserConfig {
            max_db: 0.0,
            ..Default::default()
        };
        let loud: Vec<f32> = (0..128).map(|i| if i % 2 == 0 { 0.9 } else { -0.9 }).collect();
        let mut analyser = Analyser::new(config).unwrap();
        let mut out = Vec::new();

        analyser.byte_frequency_data(&loud, &mut out);
        let first = out.iter().map(|&b| b as u32).sum::<u32>();
        assert!(first > 0);

        // Silence after sound decays instead of dropping straight to zero
        analyser.byte_frequency_data(&[0.0; 128], &mut out);
        assert!(out.iter().any(|&b| b > 0));

        analyser.reset();
        analyser.byte_frequency_data(&[0.0; 128], &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_short_input_is_padded() {
        let mut analyser = Analyser::new(AnalyserConfig::default()).unwrap();
        let mut out = Vec::new();
        analyser.byte_frequency_data(&[0.0; 10], &mut out);
        assert_eq!(out.len(), 64);
    }
}
