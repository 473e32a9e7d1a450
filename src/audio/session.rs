//! Audio source lifecycle as an explicit state machine.
//!
//! At most one source is live. Every transition that installs a new source
//! tears the previous one down first (stream released, sampler dropped).

use std::mem;
use std::path::Path;
use std::sync::Arc;

use super::backend::{AudioBackend, StreamHandle};
use super::file::AudioTrack;
use super::sampler::{Spectrum, SpectrumSampler};
use super::tap::SampleTap;
use crate::error::{Result, WallError};
use crate::params::AnalyserConfig;

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Idle,
    MicrophoneActive,
    FileLoaded,
    FilePlaying,
}

/// Device stream plus the sampler reading from it
struct ActiveSource {
    handle: Box<dyn StreamHandle>,
    sampler: SpectrumSampler,
}

impl ActiveSource {
    fn release(mut self) {
        self.handle.stop();
    }
}

struct FileSource {
    track: Arc<AudioTrack>,
    active: ActiveSource,
}

enum Source {
    Idle,
    Microphone(ActiveSource),
    Loaded(FileSource),
    Playing(FileSource),
}

/// Owns the current audio source and its sampler
pub struct AudioSession<B: AudioBackend> {
    backend: B,
    config: AnalyserConfig,
    source: Source,
}

impl<B: AudioBackend> AudioSession<B> {
    pub fn new(backend: B, config: AnalyserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            config,
            source: Source::Idle,
        })
    }

    pub fn state(&self) -> SourceState {
        match self.source {
            Source::Idle => SourceState::Idle,
            Source::Microphone(_) => SourceState::MicrophoneActive,
            Source::Loaded(_) => SourceState::FileLoaded,
            Source::Playing(_) => SourceState::FilePlaying,
        }
    }

    /// Playback flag, always in sync with the output stream
    pub fn is_playing(&self) -> bool {
        matches!(self.source, Source::Playing(_))
    }

    pub fn bin_count(&self) -> usize {
        self.config.bin_count()
    }

    /// The loaded track, if any
    pub fn track(&self) -> Option<&AudioTrack> {
        match &self.source {
            Source::Loaded(file) | Source::Playing(file) => Some(&file.track),
            _ => None,
        }
    }

    /// Tear down any source, then start capturing the default microphone
    pub fn start_microphone(&mut self) -> Result<()> {
        self.stop();

        let tap = self.new_tap();
        let handle = self.backend.open_microphone(tap.clone())?;
        let sampler = SpectrumSampler::new(&self.config, tap)?;

        self.source = Source::Microphone(ActiveSource { handle, sampler });
        tracing::info!("Microphone capture started");
        Ok(())
    }

    /// Tear down any source, then decode `path` and open it paused
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        self.stop();
        let track = AudioTrack::open(path)?;
        self.load_track(track)
    }

    /// Tear down any source, then open `track` paused
    pub fn load_track(&mut self, track: AudioTrack) -> Result<()> {
        self.stop();

        let track = Arc::new(track);
        let tap = self.new_tap();
        let handle = self.backend.open_playback(Arc::clone(&track), tap.clone())?;
        let sampler = SpectrumSampler::new(&self.config, tap)?;

        tracing::info!(
            "Loaded {} ({:.1}s, {} ch)",
            track.name(),
            track.duration_secs(),
            track.channels()
        );
        self.source = Source::Loaded(FileSource {
            track,
            active: ActiveSource { handle, sampler },
        });
        Ok(())
    }

    /// FileLoaded -> FilePlaying (restarts from the top after end of stream)
    pub fn play(&mut self) -> Result<()> {
        match mem::replace(&mut self.source, Source::Idle) {
            Source::Loaded(mut file) => {
                if file.active.handle.is_finished() {
                    file.active.handle.rewind();
                    file.active.sampler.reset();
                }
                if let Err(e) = file.active.handle.play() {
                    self.source = Source::Loaded(file);
                    return Err(e);
                }
                self.source = Source::Playing(file);
                Ok(())
            }
            Source::Playing(file) => {
                self.source = Source::Playing(file);
                Ok(())
            }
            other => {
                self.source = other;
                Err(WallError::InvalidState(format!(
                    "cannot play from {:?}",
                    self.state()
                )))
            }
        }
    }

    /// FilePlaying -> FileLoaded
    pub fn pause(&mut self) -> Result<()> {
        match mem::replace(&mut self.source, Source::Idle) {
            Source::Playing(mut file) => {
                if let Err(e) = file.active.handle.pause() {
                    self.source = Source::Playing(file);
                    return Err(e);
                }
                self.source = Source::Loaded(file);
                Ok(())
            }
            other => {
                self.source = other;
                Ok(())
            }
        }
    }

    pub fn toggle_playback(&mut self) -> Result<()> {
        if self.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Release whatever source is active and return to Idle
    pub fn stop(&mut self) {
        let previous = self.state();
        match mem::replace(&mut self.source, Source::Idle) {
            Source::Idle => return,
            Source::Microphone(active) => active.release(),
            Source::Loaded(file) | Source::Playing(file) => file.active.release(),
        }
        tracing::debug!("Released {:?} source", previous);
    }

    /// Per-frame housekeeping: a finished track drops back to FileLoaded
    pub fn poll(&mut self) {
        let finished = matches!(&self.source, Source::Playing(file) if file.active.handle.is_finished());
        if finished {
            tracing::info!("Playback finished");
            if let Err(e) = self.pause() {
                tracing::warn!("Failed to pause finished track: {}", e);
            }
        }
    }

    /// Snapshot from the active source; None unless capturing or playing
    pub fn sample(&mut self) -> Option<Spectrum> {
        match &mut self.source {
            Source::Microphone(active) => Some(active.sampler.sample()),
            Source::Playing(file) => Some(file.active.sampler.sample()),
            _ => None,
        }
    }

    /// Snapshot from the active source or the silent fallback
    pub fn sample_or_silent(&mut self) -> Spectrum {
        let bins = self.bin_count();
        self.sample().unwrap_or_else(|| Spectrum::silent(bins))
    }

    fn new_tap(&self) -> SampleTap {
        SampleTap::new(self.config.fft_size * 4)
    }
}

impl<B: AudioBackend> Drop for AudioSession<B> {
    fn drop(&mut self) {
        self.stop();
    }
}
