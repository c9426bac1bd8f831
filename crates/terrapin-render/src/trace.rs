//! Recording surface that captures the exact op stream a renderer emits.
//!
//! Unlike [`crate::raster::PixelCanvas`], no transforms are applied:
//! every op is stored with the arguments it was called with, which makes
//! the trace a direct assertion surface for replay semantics.

use terrapin_core::{Canvas, Color};

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Stroke,
    Fill,
    SetColor(Color),
    Translate {
        dx: f64,
        dy: f64,
    },
    Rotate {
        radians: f64,
    },
    Scale {
        sx: f64,
        sy: f64,
    },
    Save,
    Restore,
}

/// A line segment as seen by the surface, in the coordinates the ops were
/// issued with.
pub type Segment = ((f64, f64), (f64, f64));

/// Canvas implementation that records instead of painting.
#[derive(Debug, Default)]
pub struct TraceCanvas {
    ops: Vec<CanvasOp>,
}

impl TraceCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded ops, in call order.
    #[must_use]
    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Segments that would be drawn by the recorded `LineTo` ops: each is
    /// paired with the cursor position at the time it was issued.
    #[must_use]
    pub fn stroked_segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut cursor: Option<(f64, f64)> = None;
        for op in &self.ops {
            match *op {
                CanvasOp::MoveTo { x, y } => cursor = Some((x, y)),
                CanvasOp::LineTo { x, y } => {
                    if let Some(from) = cursor {
                        segments.push((from, (x, y)));
                    }
                    cursor = Some((x, y));
                }
                _ => {}
            }
        }
        segments
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.ops.iter().filter(|op| **op == CanvasOp::Stroke).count()
    }

    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.ops.iter().filter(|op| **op == CanvasOp::Fill).count()
    }

    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::Arc { .. }))
            .count()
    }
}

impl Canvas for TraceCanvas {
    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(CanvasOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(CanvasOp::LineTo { x, y });
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.ops.push(CanvasOp::Arc {
            cx,
            cy,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn stroke(&mut self) {
        self.ops.push(CanvasOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(CanvasOp::Fill);
    }

    fn set_color(&mut self, color: Color) {
        self.ops.push(CanvasOp::SetColor(color));
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(CanvasOp::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(CanvasOp::Rotate { radians });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(CanvasOp::Scale { sx, sy });
    }

    fn save(&mut self) {
        self.ops.push(CanvasOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(CanvasOp::Restore);
    }
}
