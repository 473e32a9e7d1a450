//! Scene state: floating shapes and their audio-reactive motion.

mod shape;
mod system;

pub use shape::{RenderedShape, Shape, ShapeKind, BASE_DRIFT_PX, MAX_TWIST, PULSE_DEPTH};
pub use system::{FrameScene, SceneSystem};
