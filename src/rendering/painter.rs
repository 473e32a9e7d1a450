//! Full-frame wallpaper painter: background grid, shapes, volume ring.

use tiny_skia::{
    FillRule, GradientStop, Paint, Path, PathBuilder, Pixmap, Point, RadialGradient, Rect, Shader,
    SpreadMode, Stroke, Transform,
};

use super::canvas::Canvas;
use crate::params::{GridStyle, Palette, Rgb, RenderStyle, RingStyle, ShapeStyle};
use crate::scene::{FrameScene, RenderedShape, ShapeKind};

/// Background grid derived from loudness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    pub spacing: f32,
    pub opacity: f32,
}

/// Volume ring derived from loudness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParams {
    pub radius: f32,
    pub width: f32,
    pub opacity: f32,
}

fn lerp(range: (f32, f32), t: f32) -> f32 {
    range.0 + (range.1 - range.0) * t
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Spacing and opacity grow linearly with loudness up to `loudness_max`
pub fn grid_params(style: &GridStyle, loudness: f32) -> GridParams {
    let max = style.loudness_max.max(f32::EPSILON);
    let t = finite_or_zero(loudness).clamp(0.0, max) / max;
    GridParams {
        spacing: lerp(style.spacing_px, t),
        opacity: lerp(style.opacity, t),
    }
}

/// Ring appears only above the threshold and saturates `excess_max` later
pub fn ring_params(style: &RingStyle, loudness: f32) -> Option<RingParams> {
    let loudness = finite_or_zero(loudness);
    if loudness <= style.threshold {
        return None;
    }
    let max = style.excess_max.max(f32::EPSILON);
    let t = (loudness - style.threshold).min(max) / max;
    Some(RingParams {
        radius: lerp(style.radius_px, t),
        width: lerp(style.width_px, t),
        opacity: style.opacity_max * t,
    })
}

/// Alpha of the white gradient edge; louder bins make shapes more translucent
pub fn shape_edge_alpha(style: &ShapeStyle, magnitude: u8) -> f32 {
    let level = magnitude as f32 / 255.0;
    (style.edge_alpha - style.edge_alpha_drop * level).clamp(0.0, 1.0)
}

/// Shape outline centred on the origin
fn shape_path(kind: ShapeKind, size: f32) -> Option<Path> {
    let half = size / 2.0;
    match kind {
        ShapeKind::Circle => PathBuilder::from_circle(0.0, 0.0, half),
        ShapeKind::Square => Rect::from_xywh(-half, -half, size, size).map(PathBuilder::from_rect),
        ShapeKind::Triangle => {
            let mut pb = PathBuilder::new();
            pb.move_to(0.0, -half);
            pb.line_to(half, half);
            pb.line_to(-half, half);
            pb.close();
            pb.finish()
        }
    }
}

/// Paints one complete frame per call
pub struct Painter {
    palette: Palette,
    style: RenderStyle,
}

impl Painter {
    pub fn new(palette: Palette, style: RenderStyle) -> Self {
        Self { palette, style }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Clear and redraw everything. No-op on an empty canvas.
    pub fn paint(&self, canvas: &mut Canvas, frame: &FrameScene) {
        let Some(pixmap) = canvas.pixmap_mut() else {
            return;
        };

        pixmap.fill(self.palette.background.opaque());

        self.draw_grid(pixmap, grid_params(&self.style.grid, frame.loudness));

        for shape in &frame.shapes {
            self.draw_shape(pixmap, shape);
        }

        if let Some(ring) = ring_params(&self.style.ring, frame.loudness) {
            self.draw_ring(pixmap, ring);
        }
    }

    fn draw_grid(&self, pixmap: &mut Pixmap, grid: GridParams) {
        let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
        let spacing = grid.spacing.max(1.0);

        let mut pb = PathBuilder::new();
        let mut x = 0.0;
        while x <= w {
            pb.move_to(x, 0.0);
            pb.line_to(x, h);
            x += spacing;
        }
        let mut y = 0.0;
        while y <= h {
            pb.move_to(0.0, y);
            pb.line_to(w, y);
            y += spacing;
        }
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(self.palette.grid.with_alpha(grid.opacity));
        let stroke = Stroke {
            width: self.style.grid.line_width_px,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn draw_shape(&self, pixmap: &mut Pixmap, shape: &RenderedShape) {
        let Some(path) = shape_path(shape.kind, shape.size) else {
            return;
        };
        let style = &self.style.shape;
        let transform = Transform::from_rotate(shape.rotation.to_degrees())
            .post_translate(shape.position.x, shape.position.y);

        let mut shadow = Paint::default();
        shadow.set_color(self.palette.shadow.with_alpha(style.shadow_alpha));
        shadow.anti_alias = true;
        pixmap.fill_path(
            &path,
            &shadow,
            FillRule::Winding,
            transform.post_translate(style.shadow_offset_px.0, style.shadow_offset_px.1),
            None,
        );

        let color = self.palette.shape_color(shape.color);
        let edge_alpha = shape_edge_alpha(style, shape.magnitude);

        let mut fill = Paint::default();
        fill.anti_alias = true;
        fill.shader = RadialGradient::new(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(0.0, 0.0),
            (shape.size / 2.0).max(1.0),
            vec![
                GradientStop::new(0.0, color.opaque()),
                GradientStop::new(1.0, Rgb::WHITE.with_alpha(edge_alpha)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        )
        .unwrap_or(Shader::SolidColor(color.opaque()));

        pixmap.fill_path(&path, &fill, FillRule::Winding, transform, None);
    }

    fn draw_ring(&self, pixmap: &mut Pixmap, ring: RingParams) {
        let (cx, cy) = (pixmap.width() as f32 / 2.0, pixmap.height() as f32 / 2.0);
        let Some(path) = PathBuilder::from_circle(cx, cy, ring.radius) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(self.palette.ring.with_alpha(ring.opacity));
        paint.anti_alias = true;
        let stroke = Stroke {
            width: ring.width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}
