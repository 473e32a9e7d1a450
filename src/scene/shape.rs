//! Floating shape attributes and the per-frame audio mapping.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::params::PaletteSlot;

/// Minimum float drift radius (pixels), added to each shape's float offset
pub const BASE_DRIFT_PX: f32 = 8.0;

/// Pulse strength at full bin magnitude (fraction of base size)
pub const PULSE_DEPTH: f32 = 0.4;

/// Extra rotation at full bin magnitude (radians)
pub const MAX_TWIST: f32 = PI * 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Triangle,
    Square,
}

impl ShapeKind {
    /// Kinds cycle in index order
    pub fn for_index(index: usize) -> Self {
        match index % 3 {
            0 => Self::Circle,
            1 => Self::Triangle,
            _ => Self::Square,
        }
    }
}

/// Immutable base attributes of one shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub index: usize,
    pub kind: ShapeKind,
    pub base_position: Vec2,
    pub size: f32,
    /// Base rotation (radians)
    pub angle: f32,
    /// Spectrum bin driving this shape, fixed at creation
    pub frequency_band: usize,
    pub color: PaletteSlot,
    /// Float speed (radians per second)
    pub velocity: f32,
    pub float_phase: f32,
    pub float_offset: f32,
}

/// Where and how big a shape is drawn this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedShape {
    pub index: usize,
    pub kind: ShapeKind,
    pub color: PaletteSlot,
    pub position: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub pulse: f32,
    /// Bin magnitude the frame was derived from
    pub magnitude: u8,
}

impl Shape {
    /// Derive the rendered attributes at time `time_s` for bin magnitude `magnitude`.
    ///
    /// Pure: the same inputs always give the same output.
    pub fn rendered(&self, time_s: f32, magnitude: u8) -> RenderedShape {
        let level = magnitude as f32 / 255.0;

        let pulse = 1.0 + (time_s * 2.0 + self.float_phase).sin() * level * PULSE_DEPTH;

        let drift = BASE_DRIFT_PX + self.float_offset;
        let theta = time_s * self.velocity + self.float_phase;
        let offset = Vec2::new(theta.sin(), theta.cos()) * drift;

        RenderedShape {
            index: self.index,
            kind: self.kind,
            color: self.color,
            position: self.base_position + offset,
            size: self.size * pulse,
            rotation: self.angle + level * MAX_TWIST,
            pulse,
            magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> Shape {
        Shape {
            index: 0,
            kind: ShapeKind::Circle,
            base_position: Vec2::new(100.0, 200.0),
            size: 50.0,
            angle: 0.3,
            frequency_band: 3,
            color: PaletteSlot::Primary,
            velocity: 0.8,
            float_phase: 0.0,
            float_offset: 2.0,
        }
    }

    #[test]
    fn test_silence_at_zero_time() {
        let r = shape().rendered(0.0, 0);
        assert_eq!(r.pulse, 1.0);
        assert_eq!(r.size, 50.0);
        assert_eq!(r.rotation, 0.3);
        // sin(0) = 0, cos(0) = 1 → drift straight down by 8 + offset
        assert_eq!(r.position, Vec2::new(100.0, 210.0));
    }

    #[test]
    fn test_full_magnitude_twists_quarter_turn() {
        let r = shape().rendered(0.0, 255);
        assert!((r.rotation - (0.3 + PI * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_peak() {
        // 2t = π/2 → sin = 1 → pulse = 1 + 0.4 at full magnitude
        let r = shape().rendered(PI / 4.0, 255);
        assert!((r.pulse - 1.4).abs() < 1e-5);
        assert!((r.size - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_deterministic() {
        let s = shape();
        assert_eq!(s.rendered(12.5, 77), s.rendered(12.5, 77));
    }

    #[test]
    fn test_kind_cycles() {
        assert_eq!(ShapeKind::for_index(0), ShapeKind::Circle);
        assert_eq!(ShapeKind::for_index(1), ShapeKind::Triangle);
        assert_eq!(ShapeKind::for_index(5), ShapeKind::Square);
    }
}
