//! Audio device boundary: microphone capture and file playback streams.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::file::AudioTrack;
use super::tap::SampleTap;
use crate::error::{Result, WallError};

/// A running (or paused) device stream owned by the session
pub trait StreamHandle {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;

    /// Release the device. The handle is dead afterwards.
    fn stop(&mut self);

    /// Whether the handle still holds device resources
    fn is_live(&self) -> bool;

    /// Playback reached the end of its track (always false for capture)
    fn is_finished(&self) -> bool;

    /// Move playback back to the first frame
    fn rewind(&mut self);
}

/// Opens device streams that feed a sample tap
pub trait AudioBackend {
    fn open_microphone(&mut self, tap: SampleTap) -> Result<Box<dyn StreamHandle>>;

    /// Open a paused output stream for `track`
    fn open_playback(
        &mut self,
        track: Arc<AudioTrack>,
        tap: SampleTap,
    ) -> Result<Box<dyn StreamHandle>>;
}

/// cpal-backed implementation using the default host
pub struct CpalBackend {
    host: cpal::Host,
}

impl CpalBackend {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn open_microphone(&mut self, tap: SampleTap) -> Result<Box<dyn StreamHandle>> {
        let device = self
            .host
            .default_input_device()
            .ok_or_else(|| WallError::Device("No audio input device found".to_string()))?;

        let supported = device
            .default_input_config()
            .map_err(|e| WallError::Device(format!("Failed to get input config: {}", e)))?;

        tracing::info!(
            "Microphone: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            supported.sample_rate().0,
            supported.channels()
        );

        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let stream = match format {
            SampleFormat::F32 => build_input::<f32>(&device, &config, tap)?,
            SampleFormat::I16 => build_input::<i16>(&device, &config, tap)?,
            SampleFormat::U16 => build_input::<u16>(&device, &config, tap)?,
            other => {
                return Err(WallError::Device(format!(
                    "Unsupported input sample format: {:?}",
                    other
                )))
            }
        };

        stream
            .play()
            .map_err(|e| WallError::Stream(format!("Failed to start input stream: {}", e)))?;

        Ok(Box::new(CpalStream::new(stream, None)))
    }

    fn open_playback(
        &mut self,
        track: Arc<AudioTrack>,
        tap: SampleTap,
    ) -> Result<Box<dyn StreamHandle>> {
        let device = self
            .host
            .default_output_device()
            .ok_or_else(|| WallError::Device("No audio output device found".to_string()))?;

        let supported = device
            .default_output_config()
            .map_err(|e| WallError::Device(format!("Failed to get output config: {}", e)))?;

        tracing::info!(
            "Playback: {} ({}Hz) on {} @ {}Hz",
            track.name(),
            track.sample_rate_hz(),
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            supported.sample_rate().0
        );

        let playhead = Playhead::new(track, supported.sample_rate().0);
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let stream = match format {
            SampleFormat::F32 => build_output::<f32>(&device, &config, playhead.clone(), tap)?,
            SampleFormat::I16 => build_output::<i16>(&device, &config, playhead.clone(), tap)?,
            SampleFormat::U16 => build_output::<u16>(&device, &config, playhead.clone(), tap)?,
            other => {
                return Err(WallError::Device(format!(
                    "Unsupported output sample format: {:?}",
                    other
                )))
            }
        };

        // Some hosts start streams on creation
        stream
            .pause()
            .map_err(|e| WallError::Stream(format!("Failed to pause output stream: {}", e)))?;

        Ok(Box::new(CpalStream::new(stream, Some(playhead))))
    }
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    tap: SampleTap,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                tap.push_interleaved(data, channels, |s| s.to_sample::<f32>());
            },
            |err| tracing::error!("Input stream error: {}", err),
            None,
        )
        .map_err(|e| WallError::Stream(format!("Failed to build input stream: {}", e)))
}

fn build_output<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    playhead: Playhead,
    tap: SampleTap,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = (config.channels as usize).max(1);
    // Reused across callbacks; grows only if the host hands over a larger buffer
    let mut mono: Vec<f32> = Vec::with_capacity(8192);
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                mono.clear();
                playhead.fill(data, channels, &mut mono);
                tap.push_mono(&mono);
            },
            |err| tracing::error!("Output stream error: {}", err),
            None,
        )
        .map_err(|e| WallError::Stream(format!("Failed to build output stream: {}", e)))
}

/// Track read position shared with the output callback
#[derive(Clone)]
struct Playhead {
    track: Arc<AudioTrack>,
    /// Fractional source frame
    position: Arc<Mutex<f64>>,
    /// Source frames advanced per output frame
    step: f64,
    finished: Arc<AtomicBool>,
}

impl Playhead {
    fn new(track: Arc<AudioTrack>, output_rate_hz: u32) -> Self {
        let step = track.sample_rate_hz() as f64 / output_rate_hz.max(1) as f64;
        Self {
            track,
            position: Arc::new(Mutex::new(0.0)),
            step,
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Nearest-sample rate conversion into an interleaved output buffer
    fn fill<T: SizedSample + FromSample<f32>>(&self, data: &mut [T], channels: usize, mono: &mut Vec<f32>) {
        let mut position = self.position.lock();
        let frames = self.track.frames();

        for frame in data.chunks_mut(channels) {
            let src = *position as usize;
            if src >= frames {
                self.finished.store(true, Ordering::Release);
                frame.fill(T::EQUILIBRIUM);
                continue;
            }
            for (ch, out) in frame.iter_mut().enumerate() {
                *out = T::from_sample(self.track.sample(src, ch));
            }
            mono.push(self.track.mono(src));
            *position += self.step;
        }
    }

    fn rewind(&self) {
        *self.position.lock() = 0.0;
        self.finished.store(false, Ordering::Release);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

struct CpalStream {
    stream: Option<cpal::Stream>,
    playhead: Option<Playhead>,
}

impl CpalStream {
    fn new(stream: cpal::Stream, playhead: Option<Playhead>) -> Self {
        Self {
            stream: Some(stream),
            playhead,
        }
    }

    fn stream(&self) -> Result<&cpal::Stream> {
        self.stream
            .as_ref()
            .ok_or_else(|| WallError::InvalidState("stream already stopped".to_string()))
    }
}

impl StreamHandle for CpalStream {
    fn play(&mut self) -> Result<()> {
        self.stream()?
            .play()
            .map_err(|e| WallError::Stream(format!("Failed to play stream: {}", e)))
    }

    fn pause(&mut self) -> Result<()> {
        self.stream()?
            .pause()
            .map_err(|e| WallError::Stream(format!("Failed to pause stream: {}", e)))
    }

    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                tracing::debug!("Pause before release failed: {}", e);
            }
            drop(stream);
        }
    }

    fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    fn is_finished(&self) -> bool {
        self.playhead.as_ref().is_some_and(Playhead::is_finished)
    }

    fn rewind(&mut self) {
        if let Some(playhead) = &self.playhead {
            playhead.rewind();
        }
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        self.stop();
    }
}
