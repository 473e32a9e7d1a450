//! Rendering: CPU canvas painting and wgpu presentation.

mod canvas;
mod painter;
mod present;

pub use canvas::Canvas;
pub use painter::{grid_params, ring_params, shape_edge_alpha, GridParams, Painter, RingParams};
pub use present::Presenter;
