//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::params::{CaptureConfig, RecordingConfig, RenderConfig, SceneConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavewall")]
#[command(about = "Audio-reactive wallpaper generator", long_about = None)]
pub struct Args {
    /// Number of floating shapes
    #[arg(long, value_name = "COUNT", default_value = "30")]
    pub shapes: usize,

    /// Seed for reproducible shape layouts
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// WAV file to play (press F to load, Space to play/pause)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Start capturing the microphone immediately
    #[arg(long)]
    pub mic: bool,

    /// Initial window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "960")]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "540")]
    pub height: u32,

    /// Directory for screenshots, settings exports and recordings
    #[arg(long, value_name = "DIR", default_value = "captures")]
    pub output_dir: PathBuf,

    /// Render the --file track offline to PNG frames (duration in seconds)
    #[arg(long, value_name = "SECONDS", requires = "file")]
    pub record: Option<f32>,

    /// Frame rate for --record
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: u32,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            shape_count: self.shapes,
            seed: self.seed,
            ..Default::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
        }
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            output_dir: self.output_dir.clone(),
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| {
            let mut config = RecordingConfig::new(duration, &self.output_dir);
            config.fps = self.fps;
            config.width = self.width;
            config.height = self.height;
            config
        })
    }
}
