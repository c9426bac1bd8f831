//! Rendering surfaces for Terrapin: a software raster target and a
//! recording trace, plus a one-call offscreen frame renderer.

pub mod raster;
pub mod trace;
mod transform;

pub use raster::{PixelCanvas, Rgba8};
pub use trace::{CanvasOp, Segment, TraceCanvas};
pub use transform::Affine;

use terrapin_core::{TurtleState, render_scene};
use tracing::debug;

/// Render one offscreen frame of the current scene at the given pixel size.
#[must_use]
pub fn render_frame(state: &TurtleState, width: u32, height: u32) -> PixelCanvas {
    let mut canvas = PixelCanvas::new(
        width as usize,
        height as usize,
        state.config().background,
    );
    render_scene(state, &mut canvas, f64::from(width), f64::from(height));
    debug!(
        width,
        height,
        steps = state.step_count(),
        "rendered offscreen frame"
    );
    canvas
}
