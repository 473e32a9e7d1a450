//! Rendering, capture and recording configuration.

use std::path::{Path, PathBuf};

/// Background grid driven by loudness
#[derive(Debug, Clone)]
pub struct GridStyle {
    /// Loudness at which the grid stops changing (byte magnitude)
    pub loudness_max: f32,

    /// Line spacing at silence and at `loudness_max` (pixels)
    pub spacing_px: (f32, f32),

    /// Line opacity at silence and at `loudness_max`
    pub opacity: (f32, f32),

    /// Line width (pixels)
    pub line_width_px: f32,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            loudness_max: 128.0,
            spacing_px: (48.0, 84.0),
            opacity: (0.10, 0.28),
            line_width_px: 1.0,
        }
    }
}

/// Volume-triggered ring overlay
#[derive(Debug, Clone)]
pub struct RingStyle {
    /// Loudness the ring appears above (byte magnitude)
    pub threshold: f32,

    /// Loudness above threshold at which the ring saturates
    pub excess_max: f32,

    /// Radius just above threshold and at saturation (pixels)
    pub radius_px: (f32, f32),

    /// Stroke width just above threshold and at saturation (pixels)
    pub width_px: (f32, f32),

    /// Opacity at saturation (starts from 0 at threshold)
    pub opacity_max: f32,
}

impl Default for RingStyle {
    fn default() -> Self {
        Self {
            threshold: 48.0,
            excess_max: 80.0,
            radius_px: (120.0, 320.0),
            width_px: (2.0, 14.0),
            opacity_max: 0.6,
        }
    }
}

/// Per-shape fill and shadow
#[derive(Debug, Clone)]
pub struct ShapeStyle {
    /// Opacity of the white gradient edge at silence
    pub edge_alpha: f32,

    /// How much the edge opacity drops at full bin magnitude
    pub edge_alpha_drop: f32,

    /// Drop shadow offset (pixels)
    pub shadow_offset_px: (f32, f32),

    /// Drop shadow opacity
    pub shadow_alpha: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            edge_alpha: 0.85,
            edge_alpha_drop: 0.6,
            shadow_offset_px: (0.0, 6.0),
            shadow_alpha: 0.35,
        }
    }
}

/// Everything the painter needs besides the palette
#[derive(Debug, Clone, Default)]
pub struct RenderStyle {
    pub grid: GridStyle,
    pub ring: RingStyle,
    pub shape: ShapeStyle,
}

/// Window configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 960,
            window_height: 540,
        }
    }
}

/// Where screenshots, settings exports and recordings are written
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub output_dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("captures"),
        }
    }
}

impl CaptureConfig {
    /// Screenshot path for the n-th capture of this session
    pub fn screenshot_path(&self, n: usize) -> PathBuf {
        self.output_dir.join(format!("wavewall-{:03}.png", n))
    }

    /// Settings export path for the n-th export of this session
    pub fn settings_path(&self, n: usize) -> PathBuf {
        self.output_dir.join(format!("wavewall-settings-{:03}.json", n))
    }
}

/// Offline recording configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: PathBuf,

    /// Frame rate (FPS)
    pub fps: u32,

    /// Canvas size (pixels)
    pub width: u32,
    pub height: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32, output_dir: &Path) -> Self {
        Self {
            duration_secs,
            output_dir: output_dir.to_path_buf(),
            fps: 60,
            width: 960,
            height: 540,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs.max(0.0) * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of a single frame
    pub fn frame_path(&self, frame: usize) -> PathBuf {
        self.frames_dir().join(format!("frame_{:05}.png", frame))
    }

    /// Timestamp of a frame (seconds)
    pub fn frame_time(&self, frame: usize) -> f32 {
        frame as f32 / self.fps.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frame_math() {
        let config = RecordingConfig::new(1.5, Path::new("out"));
        assert_eq!(config.total_frames(), 90);
        assert_eq!(config.frame_time(60), 1.0);
        assert_eq!(
            config.frame_path(7),
            Path::new("out").join("frames").join("frame_00007.png")
        );
    }

    #[test]
    fn test_capture_paths() {
        let config = CaptureConfig {
            output_dir: PathBuf::from("caps"),
        };
        assert_eq!(config.screenshot_path(2), Path::new("caps/wavewall-002.png"));
        assert_eq!(
            config.settings_path(0),
            Path::new("caps/wavewall-settings-000.json")
        );
    }
}
