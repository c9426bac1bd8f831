//! Core turtle state machine and replay log shared across the Terrapin workspace.
//!
//! The scene is never painted incrementally: every motion or turn command
//! appends an immutable [`Step`] to an append-only log, and each paint
//! replays the whole log from a fixed baseline against a [`Canvas`]. The
//! hosting runtime may therefore discard pixels at any time (resize,
//! expose) and ask for a repaint without losing anything.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

/// A point in turtle space. `y` grows upward; the renderer flips it when
/// emitting canvas coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Construct a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point reached by travelling `distance` along `heading` (radians).
    /// A negative distance travels backward along the same heading.
    #[must_use]
    pub fn advanced(self, distance: f64, heading: f64) -> Self {
        Self::new(
            self.x + distance * heading.cos(),
            self.y + distance * heading.sin(),
        )
    }
}

/// An RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Construct an opaque color.
    #[must_use]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Construct a color with an explicit alpha channel.
    #[must_use]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// Position/heading pair reconstructed by walking the step log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    pub position: Position,
    pub heading: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Position::new(0.0, 0.0),
            heading: 0.0,
        }
    }
}

impl Pose {
    /// Advance along the current heading by a signed distance.
    pub fn advance(&mut self, distance: f64) {
        self.position = self.position.advanced(distance, self.heading);
    }

    /// Add a turn in degrees. Positive turns counterclockwise. The heading
    /// accumulates without normalization.
    pub fn rotate(&mut self, degrees: f64) {
        self.heading += degrees.to_radians();
    }
}

/// One immutable entry in the replay log.
///
/// Pen and visibility toggles never appear here: they mutate flags that are
/// consulted when a step is recorded or when the body icon is drawn, but the
/// toggle itself leaves no mark to replay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Step {
    /// Motion along the replay heading. The pen flag is frozen at record
    /// time; replay never re-reads the live pen state.
    Advance { distance: f64, pen_down: bool },
    /// Heading change in degrees; positive turns counterclockwise.
    Rotate { degrees: f64 },
}

impl Step {
    /// Apply this step's effect to a replay pose.
    pub fn apply(&self, pose: &mut Pose) {
        match *self {
            Self::Advance { distance, .. } => pose.advance(distance),
            Self::Rotate { degrees } => pose.rotate(degrees),
        }
    }
}

/// Drawing surface consumed by the scene renderer.
///
/// The contract follows the usual 2D immediate-mode canvas model:
/// * `move_to`/`line_to` extend the current path; `arc` begins a new
///   subpath at the arc's start angle.
/// * Path points are captured in device space at append time, so transform
///   changes affect only subsequently appended points.
/// * `stroke` and `fill` paint the accumulated path with the current color
///   and clear it.
/// * `save`/`restore` manage the transform stack only; they do not touch
///   the path or the current color.
pub trait Canvas {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Append a circular arc subpath around `(cx, cy)` from `start_angle`
    /// to `end_angle` (radians). A full circle is `(-PI, PI)`.
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn set_color(&mut self, color: Color);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn save(&mut self);
    fn restore(&mut self);
}

/// Errors raised while constructing a turtle from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurtleStateError {
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Static configuration for a Terrapin session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrapinConfig {
    /// Delay applied by the controller after each step-appending command,
    /// in milliseconds. Zero disables pacing.
    pub step_delay_ms: u64,
    /// Uniform scale applied to the scene around the anchor.
    pub zoom: f64,
    /// Fixed canvas anchor offset in surface pixels (y-down). `None`
    /// anchors the turtle origin at the surface center.
    pub anchor: Option<Position>,
    /// Color used to stroke the trail.
    pub trail_color: Color,
    /// Surface clear color.
    pub background: Color,
}

impl Default for TerrapinConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 500,
            zoom: 1.0,
            anchor: None,
            trail_color: Color::WHITE,
            background: Color::BLACK,
        }
    }
}

impl TerrapinConfig {
    fn validate(&self) -> Result<(), TurtleStateError> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(TurtleStateError::InvalidConfig(
                "zoom must be finite and positive",
            ));
        }
        if let Some(anchor) = self.anchor
            && !(anchor.x.is_finite() && anchor.y.is_finite())
        {
            return Err(TurtleStateError::InvalidConfig(
                "anchor coordinates must be finite",
            ));
        }
        Ok(())
    }
}

/// The turtle: live state plus the append-only step log.
///
/// The live `position`/`heading` fields give synchronous feedback after each
/// command; the authoritative pose as seen by the renderer is always the
/// one recomputed by [`TurtleState::replay_pose`] from the log.
#[derive(Debug, Clone)]
pub struct TurtleState {
    config: TerrapinConfig,
    steps: Vec<Step>,
    position: Position,
    heading: f64,
    pen_down: bool,
    visible: bool,
}

impl TurtleState {
    /// Construct a turtle at the origin, heading 0, pen down, visible.
    pub fn new(config: TerrapinConfig) -> Result<Self, TurtleStateError> {
        config.validate()?;
        Ok(Self {
            config,
            steps: Vec::new(),
            position: Position::new(0.0, 0.0),
            heading: 0.0,
            pen_down: true,
            visible: true,
        })
    }

    /// Append a turn step. Positive degrees turn counterclockwise. Any
    /// finite or non-finite input is accepted unconditionally.
    pub fn turn(&mut self, degrees: f64) {
        self.steps.push(Step::Rotate { degrees });
        self.heading += degrees.to_radians();
    }

    /// Append a motion step tagged with the pen flag as it is right now.
    /// Negative distances move backward along the current heading.
    pub fn advance(&mut self, distance: f64) {
        self.steps.push(Step::Advance {
            distance,
            pen_down: self.pen_down,
        });
        self.position = self.position.advanced(distance, self.heading);
    }

    /// Set the pen flag; affects only subsequently appended motion steps.
    pub fn set_pen_down(&mut self, pen_down: bool) {
        self.pen_down = pen_down;
    }

    /// Set the visibility flag consulted when the body icon is drawn.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Live position, updated synchronously by the last command.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Live heading in radians.
    #[must_use]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[must_use]
    pub fn pen_down(&self) -> bool {
        self.pen_down
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// The recorded steps, in append order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn config(&self) -> &TerrapinConfig {
        &self.config
    }

    /// Recompute the authoritative pose by replaying the full log from the
    /// reset baseline (origin, heading 0).
    #[must_use]
    pub fn replay_pose(&self) -> Pose {
        let mut pose = Pose::default();
        for step in &self.steps {
            step.apply(&mut pose);
        }
        pose
    }
}

// Body icon template, in local units centered on the turtle and oriented
// along its heading: a stretched circular body, four legs, and a head.
const BODY_RADIUS: f64 = 5.0;
const BODY_STRETCH: f64 = 1.25;
const LEG_RADIUS: f64 = 1.5;
const LEG_OFFSET_X: f64 = 4.0;
const LEG_OFFSET_Y: f64 = 5.0;
const HEAD_RADIUS: f64 = 2.0;
const HEAD_OFFSET_X: f64 = 8.0;

/// Fixed translucent fill for the body icon. Not user-configurable.
const BODY_COLOR: Color = Color::rgba(0.3, 0.9, 0.4, 0.7);

/// Replay the scene onto a canvas of the given surface size.
///
/// Resets the transform to the configured anchor, replays every recorded
/// step into a single stroked path, and overlays the body icon at the final
/// replay pose unless the turtle is hidden. Idempotent: repeated calls with
/// an unchanged log produce identical output, and the log is never mutated.
pub fn render_scene(state: &TurtleState, canvas: &mut dyn Canvas, width: f64, height: f64) {
    let config = state.config();
    let anchor = config
        .anchor
        .unwrap_or_else(|| Position::new(width * 0.5, height * 0.5));

    canvas.save();
    canvas.translate(anchor.x, anchor.y);
    canvas.scale(config.zoom, config.zoom);
    canvas.set_color(config.trail_color);

    let mut pose = Pose::default();
    canvas.move_to(0.0, 0.0);
    for step in state.steps() {
        step.apply(&mut pose);
        if let Step::Advance { pen_down, .. } = step {
            let Position { x, y } = pose.position;
            if *pen_down {
                canvas.line_to(x, -y);
            } else {
                canvas.move_to(x, -y);
            }
        }
    }
    canvas.stroke();

    if !state.visible() {
        canvas.restore();
        return;
    }

    canvas.set_color(BODY_COLOR);
    canvas.translate(pose.position.x, -pose.position.y);
    canvas.rotate(-pose.heading);

    canvas.save();
    canvas.scale(BODY_STRETCH, 1.0);
    canvas.arc(0.0, 0.0, BODY_RADIUS, -PI, PI);
    canvas.restore();
    canvas.fill();

    canvas.arc(-LEG_OFFSET_X, -LEG_OFFSET_Y, LEG_RADIUS, -PI, PI);
    canvas.arc(-LEG_OFFSET_X, LEG_OFFSET_Y, LEG_RADIUS, -PI, PI);
    canvas.arc(LEG_OFFSET_X, -LEG_OFFSET_Y, LEG_RADIUS, -PI, PI);
    canvas.arc(LEG_OFFSET_X, LEG_OFFSET_Y, LEG_RADIUS, -PI, PI);
    canvas.fill();

    canvas.arc(HEAD_OFFSET_X, 0.0, HEAD_RADIUS, -PI, PI);
    canvas.fill();

    canvas.restore();
}
