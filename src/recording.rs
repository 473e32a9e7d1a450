//! Offline recording: render a decoded track frame by frame to PNG.
//!
//! Frame `n` is sampled at exactly `n / fps` seconds, so a seeded scene
//! always produces the same frames.

use std::fs;

use crate::audio::{Analyser, AudioTrack, Spectrum};
use crate::error::Result;
use crate::export::save_screenshot;
use crate::params::{AnalyserConfig, RecordingConfig};
use crate::rendering::{Canvas, Painter};
use crate::scene::SceneSystem;

/// Analyses a track at arbitrary timestamps instead of from a live tap
pub struct TrackSampler<'a> {
    track: &'a AudioTrack,
    analyser: Analyser,
    window: Vec<f32>,
    bytes: Vec<u8>,
}

impl<'a> TrackSampler<'a> {
    pub fn new(track: &'a AudioTrack, config: &AnalyserConfig) -> Result<Self> {
        Ok(Self {
            track,
            analyser: Analyser::new(config.clone())?,
            window: vec![0.0; config.fft_size],
            bytes: Vec::with_capacity(config.bin_count()),
        })
    }

    /// Spectrum of the samples just before `time_s`
    pub fn sample_at(&mut self, time_s: f32) -> Spectrum {
        self.track.mono_window(time_s, &mut self.window);
        self.analyser
            .byte_frequency_data(&self.window, &mut self.bytes);
        Spectrum::new(self.bytes.clone())
    }
}

/// Render `config.total_frames()` frames; returns the number written
pub fn record(
    track: &AudioTrack,
    scene: &SceneSystem,
    painter: &Painter,
    analyser_config: &AnalyserConfig,
    config: &RecordingConfig,
) -> Result<usize> {
    fs::create_dir_all(config.frames_dir())?;

    let mut sampler = TrackSampler::new(track, analyser_config)?;
    let mut canvas = Canvas::new(config.width, config.height);
    let total = config.total_frames();

    tracing::info!(
        "Recording {} frames of {} at {} fps to {}",
        total,
        track.name(),
        config.fps,
        config.frames_dir().display()
    );

    let mut written = 0;
    for frame_num in 0..total {
        let time_s = config.frame_time(frame_num);
        let spectrum = sampler.sample_at(time_s);
        let frame = scene.tick(time_s, &spectrum);
        painter.paint(&mut canvas, &frame);

        if save_screenshot(&canvas, &config.frame_path(frame_num))? {
            written += 1;
        }
        if config.fps > 0 && frame_num % config.fps as usize == 0 {
            tracing::debug!("Frame {}/{} (loudness {:.1})", frame_num, total, frame.loudness);
        }
    }

    tracing::info!("Recording complete: {} frames", written);
    Ok(written)
}
