//! Per-frame spectrum snapshot and loudness.

use super::analyser::Analyser;
use super::tap::SampleTap;
use crate::error::Result;
use crate::params::AnalyserConfig;

/// One frame's byte magnitudes plus their mean
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    magnitudes: Vec<u8>,
    loudness: f32,
}

impl Spectrum {
    pub fn new(magnitudes: Vec<u8>) -> Self {
        let loudness = mean(&magnitudes);
        Self {
            magnitudes,
            loudness,
        }
    }

    /// All-zero snapshot used whenever no source is active
    pub fn silent(bins: usize) -> Self {
        Self::new(vec![0; bins])
    }

    pub fn magnitudes(&self) -> &[u8] {
        &self.magnitudes
    }

    /// Magnitude of a bin; bins past the end read as silent
    pub fn magnitude(&self, band: usize) -> u8 {
        self.magnitudes.get(band).copied().unwrap_or(0)
    }

    pub fn loudness(&self) -> f32 {
        self.loudness
    }

    pub fn bin_count(&self) -> usize {
        self.magnitudes.len()
    }
}

fn mean(magnitudes: &[u8]) -> f32 {
    if magnitudes.is_empty() {
        return 0.0;
    }
    magnitudes.iter().map(|&m| m as u32).sum::<u32>() as f32 / magnitudes.len() as f32
}

/// Reads the tap and runs the analyser once per frame
pub struct SpectrumSampler {
    analyser: Analyser,
    tap: SampleTap,
    window: Vec<f32>,
    bytes: Vec<u8>,
}

impl SpectrumSampler {
    pub fn new(config: &AnalyserConfig, tap: SampleTap) -> Result<Self> {
        let analyser = Analyser::new(config.clone())?;
        Ok(Self {
            window: vec![0.0; config.fft_size],
            bytes: Vec::with_capacity(config.bin_count()),
            analyser,
            tap,
        })
    }

    pub fn bin_count(&self) -> usize {
        self.analyser.bin_count()
    }

    /// Take the current snapshot
    pub fn sample(&mut self) -> Spectrum {
        self.tap.snapshot(&mut self.window);
        self.analyser
            .byte_frequency_data(&self.window, &mut self.bytes);
        Spectrum::new(self.bytes.clone())
    }

    pub fn reset(&mut self) {
        self.analyser.reset();
        self.tap.clear();
    }
}
