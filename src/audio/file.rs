//! WAV file decoding for file playback and offline recording.

use std::path::Path;

use crate::error::{Result, WallError};

/// Decoded audio track (interleaved f32 samples)
#[derive(Debug, Clone)]
pub struct AudioTrack {
    name: String,
    samples: Vec<f32>,
    channels: u16,
    sample_rate_hz: u32,
}

impl AudioTrack {
    /// Decode a WAV file (integer or float PCM)
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_samples(name, samples, spec.channels, spec.sample_rate)
    }

    /// Build a track from interleaved samples
    pub fn from_samples(
        name: impl Into<String>,
        samples: Vec<f32>,
        channels: u16,
        sample_rate_hz: u32,
    ) -> Result<Self> {
        let name = name.into();
        if channels == 0 || sample_rate_hz == 0 || samples.len() < channels as usize {
            return Err(WallError::EmptyTrack(name));
        }
        Ok(Self {
            name,
            samples,
            channels,
            sample_rate_hz,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate_hz as f32
    }

    /// Sample of one channel in one frame (silence past the end)
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        let channels = self.channels as usize;
        self.samples
            .get(frame * channels + channel % channels)
            .copied()
            .unwrap_or(0.0)
    }

    /// Channel mean of one frame
    pub fn mono(&self, frame: usize) -> f32 {
        let channels = self.channels as usize;
        (0..channels).map(|c| self.sample(frame, c)).sum::<f32>() / channels as f32
    }

    /// Fill `out` with the mono samples that end just before `time_s`, oldest first
    pub fn mono_window(&self, time_s: f32, out: &mut [f32]) {
        let end = (time_s.max(0.0) * self.sample_rate_hz as f32) as usize;
        let start = end as isize - out.len() as isize;
        for (i, slot) in out.iter_mut().enumerate() {
            let frame = start + i as isize;
            *slot = if frame < 0 {
                0.0
            } else {
                self.mono(frame as usize)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_roundtrip_int16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..100 {
            writer.write_sample(i16::MAX).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let track = AudioTrack::open(&path).unwrap();
        assert_eq!(track.name(), "tone.wav");
        assert_eq!(track.frames(), 100);
        assert_eq!(track.channels(), 2);
        assert!((track.sample(0, 0) - 1.0).abs() < 1e-3);
        assert!((track.mono(5) - 0.5).abs() < 1e-3);
        assert!((track.duration_secs() - 0.0125).abs() < 1e-6);
    }

    #[test]
    fn test_empty_track_rejected() {
        assert!(AudioTrack::from_samples("x", Vec::new(), 1, 44100).is_err());
        assert!(AudioTrack::from_samples("x", vec![0.0], 0, 44100).is_err());
    }

    #[test]
    fn test_mono_window_pads_before_start() {
        let track = AudioTrack::from_samples("ramp", (0..10).map(|i| i as f32).collect(), 1, 10)
            .unwrap();
        let mut out = [9.0; 4];
        track.mono_window(0.2, &mut out);
        assert_eq!(out, [0.0, 0.0, 0.0, 1.0]);
        track.mono_window(2.0, &mut out);
        // Past the end reads as silence
        assert_eq!(out, [0.0; 4]);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(AudioTrack::open(Path::new("/definitely/not/here.wav")).is_err());
    }
}
