//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, seconds, dBFS, byte magnitudes)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod palette;
mod render;
mod scene;

// Re-export all types
pub use audio::AnalyserConfig;
pub use palette::{Palette, PaletteSlot, Rgb};
pub use render::{
    CaptureConfig, GridStyle, RecordingConfig, RenderConfig, RenderStyle, RingStyle, ShapeStyle,
};
pub use scene::SceneConfig;
