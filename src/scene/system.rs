//! Shape set generation and the per-frame scene tick.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use super::shape::{RenderedShape, Shape, ShapeKind};
use crate::audio::Spectrum;
use crate::error::Result;
use crate::params::{PaletteSlot, SceneConfig};

/// Everything the painter needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameScene {
    pub width: u32,
    pub height: u32,
    pub loudness: f32,
    pub shapes: Vec<RenderedShape>,
}

/// Generate a full shape set for a `width` x `height` canvas with `bins` spectrum bins.
///
/// Degenerate canvases are clamped to 1x1; positions stay finite.
/// `config` must already be validated (see `SceneSystem::new`).
pub(crate) fn generate<R: Rng>(
    config: &SceneConfig,
    width: u32,
    height: u32,
    bins: usize,
    rng: &mut R,
) -> Vec<Shape> {
    let x_range = inset_range(width.max(1) as f32, config.margin_px);
    let y_range = inset_range(height.max(1) as f32, config.margin_px);

    (0..config.shape_count)
        .map(|index| Shape {
            index,
            kind: ShapeKind::for_index(index),
            base_position: Vec2::new(
                rng.gen_range(x_range.0..=x_range.1),
                rng.gen_range(y_range.0..=y_range.1),
            ),
            size: rng.gen_range(config.size_px.clone()),
            angle: rng.gen_range(0.0..TAU),
            frequency_band: if bins == 0 { 0 } else { rng.gen_range(0..bins) },
            color: PaletteSlot::for_index(index),
            velocity: rng.gen_range(config.velocity.clone()),
            float_phase: rng.gen_range(0.0..TAU),
            float_offset: rng.gen_range(config.float_offset_px.clone()),
        })
        .collect()
}

/// `[margin, extent - margin]`, collapsing toward the centre on short axes
fn inset_range(extent: f32, margin: f32) -> (f32, f32) {
    let lo = margin.min(extent / 2.0);
    let hi = (extent - margin).max(lo);
    (lo, hi)
}

/// Scene state: base shapes for the current canvas and spectrum resolution
pub struct SceneSystem {
    config: SceneConfig,
    width: u32,
    height: u32,
    bins: usize,
    shapes: Vec<Shape>,
    rng: StdRng,
}

impl SceneSystem {
    pub fn new(config: SceneConfig, width: u32, height: u32, bins: usize) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut scene = Self {
            config,
            width,
            height,
            bins,
            shapes: Vec::new(),
            rng,
        };
        scene.regenerate();
        Ok(scene)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bin_count(&self) -> usize {
        self.bins
    }

    /// Replace the whole shape set (no carry-over from the previous one)
    pub fn regenerate(&mut self) {
        self.shapes = generate(
            &self.config,
            self.width,
            self.height,
            self.bins,
            &mut self.rng,
        );
        tracing::debug!(
            "Generated {} shapes for {}x{} ({} bins)",
            self.shapes.len(),
            self.width,
            self.height,
            self.bins
        );
    }

    /// New canvas size resets the scene
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.regenerate();
    }

    /// Regenerate if the spectrum resolution changed, so no band points past the end
    pub fn ensure_bin_count(&mut self, bins: usize) {
        if bins != self.bins {
            tracing::info!("Bin count changed {} -> {}, regenerating", self.bins, bins);
            self.bins = bins;
            self.regenerate();
        }
    }

    /// Derive this frame's rendered shapes. Pure apart from reading `self`.
    pub fn tick(&self, time_s: f32, spectrum: &Spectrum) -> FrameScene {
        FrameScene {
            width: self.width,
            height: self.height,
            loudness: spectrum.loudness(),
            shapes: self
                .shapes
                .iter()
                .map(|shape| shape.rendered(time_s, spectrum.magnitude(shape.frequency_band)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seeded(seed: u64) -> SceneConfig {
        SceneConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_960x540() {
        let scene = SceneSystem::new(seeded(7), 960, 540, 64).unwrap();
        assert_eq!(scene.shapes().len(), 30);

        for shape in scene.shapes() {
            assert!(shape.frequency_band < 64);
            assert!((40.0..=920.0).contains(&shape.base_position.x));
            assert!((40.0..=500.0).contains(&shape.base_position.y));
            assert!((38.0..=66.0).contains(&shape.size));
        }

        let frame = scene.tick(0.0, &Spectrum::silent(64));
        for (rendered, shape) in frame.shapes.iter().zip(scene.shapes()) {
            assert_eq!(rendered.pulse, 1.0);
            assert_eq!(rendered.size, shape.size);
        }
        assert_eq!(frame.loudness, 0.0);
    }

    #[test]
    fn test_kind_and_color_cycle() {
        let scene = SceneSystem::new(seeded(1), 960, 540, 64).unwrap();
        for shape in scene.shapes() {
            assert_eq!(shape.kind, ShapeKind::for_index(shape.index));
            assert_eq!(shape.color, PaletteSlot::for_index(shape.index));
        }
    }

    #[test]
    fn test_degenerate_canvas_is_finite() {
        let scene = SceneSystem::new(seeded(3), 0, 0, 64).unwrap();
        for shape in scene.shapes() {
            assert_eq!(shape.base_position, Vec2::new(0.5, 0.5));
        }
        let frame = scene.tick(1.0, &Spectrum::silent(64));
        assert!(frame
            .shapes
            .iter()
            .all(|s| s.position.is_finite() && s.size.is_finite()));
    }

    #[test]
    fn test_inverted_ranges_rejected_before_generation() {
        let inverted_size = SceneConfig {
            size_px: 66.0..=38.0,
            ..seeded(1)
        };
        assert!(SceneSystem::new(inverted_size, 960, 540, 64).is_err());

        let inverted_velocity = SceneConfig {
            velocity: 1.2..=0.4,
            ..seeded(1)
        };
        assert!(SceneSystem::new(inverted_velocity, 960, 540, 64).is_err());
    }

    #[test]
    fn test_zero_bins_uses_band_zero() {
        let scene = SceneSystem::new(seeded(3), 200, 200, 0).unwrap();
        assert!(scene.shapes().iter().all(|s| s.frequency_band == 0));
    }

    #[test]
    fn test_resize_replaces_set() {
        let mut scene = SceneSystem::new(seeded(11), 960, 540, 64).unwrap();
        let before = scene.shapes().to_vec();
        scene.resize(400, 300);
        assert_eq!(scene.size(), (400, 300));
        assert_ne!(scene.shapes(), &before[..]);
        for shape in scene.shapes() {
            assert!(shape.base_position.x <= 360.0);
            assert!(shape.base_position.y <= 260.0);
        }
    }

    #[test]
    fn test_bin_count_change_regenerates_in_bounds() {
        let mut scene = SceneSystem::new(seeded(5), 960, 540, 1024).unwrap();
        scene.ensure_bin_count(16);
        assert_eq!(scene.bin_count(), 16);
        assert!(scene.shapes().iter().all(|s| s.frequency_band < 16));

        // Same count is a no-op
        let before = scene.shapes().to_vec();
        scene.ensure_bin_count(16);
        assert_eq!(scene.shapes(), &before[..]);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = SceneSystem::new(seeded(42), 960, 540, 64).unwrap();
        let b = SceneSystem::new(seeded(42), 960, 540, 64).unwrap();
        assert_eq!(a.shapes(), b.shapes());
    }

    #[test]
    fn test_short_spectrum_reads_silent() {
        let scene = SceneSystem::new(seeded(9), 960, 540, 64).unwrap();
        let frame = scene.tick(0.5, &Spectrum::new(Vec::new()));
        assert!(frame.shapes.iter().all(|s| s.magnitude == 0));
    }

    proptest! {
        #[test]
        fn prop_generation_bounds(
            seed in any::<u64>(),
            width in 0u32..3000,
            height in 0u32..3000,
            bins in 1usize..2048,
        ) {
            let config = seeded(seed);
            let mut rng = StdRng::seed_from_u64(seed);
            let shapes = generate(&config, width, height, bins, &mut rng);
            let (x_lo, x_hi) = inset_range(width.max(1) as f32, 40.0);
            let (y_lo, y_hi) = inset_range(height.max(1) as f32, 40.0);

            for shape in &shapes {
                prop_assert!(shape.frequency_band < bins);
                prop_assert!(shape.base_position.x >= x_lo && shape.base_position.x <= x_hi);
                prop_assert!(shape.base_position.y >= y_lo && shape.base_position.y <= y_hi);
                prop_assert!(shape.size >= 38.0 && shape.size <= 66.0);
                if width >= 80 {
                    prop_assert!(shape.base_position.x >= 40.0);
                    prop_assert!(shape.base_position.x <= width as f32 - 40.0);
                }
            }
        }

        #[test]
        fn prop_tick_is_deterministic(
            seed in any::<u64>(),
            t in 0.0f32..1000.0,
            m in any::<u8>(),
        ) {
            let scene = SceneSystem::new(seeded(seed), 960, 540, 64).unwrap();
            let spectrum = Spectrum::new(vec![m; 64]);
            prop_assert_eq!(scene.tick(t, &spectrum), scene.tick(t, &spectrum));
        }
    }
}
