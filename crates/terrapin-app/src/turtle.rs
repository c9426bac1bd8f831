//! Controller-side command API for the one turtle of a session.

use std::sync::{MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use terrapin_core::{Pose, Position, TurtleState};

use crate::SharedTurtle;
use crate::signal::{RenderSignal, SignalSubmit};

/// The turtle handle held by the controlling program.
///
/// Step-appending commands mutate the shared state under the lock, request
/// a repaint, and then pace the controller thread so the walk stays
/// watchable. Only the controller sleeps; the render context never waits
/// on pacing.
pub struct Turtle {
    world: SharedTurtle,
    submit: SignalSubmit,
    pace: Duration,
}

impl Turtle {
    pub(crate) fn new(world: SharedTurtle, submit: SignalSubmit, pace: Duration) -> Self {
        Self {
            world,
            submit,
            pace,
        }
    }

    /// Turn counterclockwise by `degrees`.
    pub fn turn_left(&self, degrees: f64) {
        self.lock().turn(degrees);
        self.after_step();
    }

    /// Turn clockwise by `degrees`.
    pub fn turn_right(&self, degrees: f64) {
        self.lock().turn(-degrees);
        self.after_step();
    }

    /// Move along the current heading, drawing if the pen is down.
    pub fn forward(&self, distance: f64) {
        self.lock().advance(distance);
        self.after_step();
    }

    /// Move against the current heading, drawing if the pen is down.
    pub fn backward(&self, distance: f64) {
        self.lock().advance(-distance);
        self.after_step();
    }

    /// Lift the pen; subsequent motion repositions without drawing.
    pub fn pen_up(&self) {
        self.lock().set_pen_down(false);
    }

    /// Lower the pen; subsequent motion draws.
    pub fn pen_down(&self) {
        self.lock().set_pen_down(true);
    }

    /// Hide the body icon. The trail stays; repaints immediately.
    pub fn hide(&self) {
        self.set_visible(false);
    }

    /// Show the body icon again; repaints immediately.
    pub fn show(&self) {
        self.set_visible(true);
    }

    /// Signal the render context that the command sequence is finished.
    pub fn close(&self) {
        (self.submit)(RenderSignal::Shutdown);
    }

    /// Live position for synchronous feedback.
    #[must_use]
    pub fn position(&self) -> Position {
        self.lock().position()
    }

    /// Live heading in radians.
    #[must_use]
    pub fn heading(&self) -> f64 {
        self.lock().heading()
    }

    #[must_use]
    pub fn is_pen_down(&self) -> bool {
        self.lock().pen_down()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.lock().visible()
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.lock().step_count()
    }

    /// The authoritative pose, recomputed from the step log.
    #[must_use]
    pub fn replay_pose(&self) -> Pose {
        self.lock().replay_pose()
    }

    /// The pacing delay applied after each step-appending command.
    #[must_use]
    pub fn pace(&self) -> Duration {
        self.pace
    }

    fn set_visible(&self, visible: bool) {
        self.lock().set_visible(visible);
        // Nothing lands in the log, so this cannot ride the step-append
        // repaint path.
        (self.submit)(RenderSignal::Repaint);
    }

    fn after_step(&self) {
        (self.submit)(RenderSignal::Repaint);
        if !self.pace.is_zero() {
            thread::sleep(self.pace);
        }
        thread::yield_now();
    }

    // The command methods cannot leave the state half-written, so a
    // poisoned lock is safe to enter.
    fn lock(&self) -> MutexGuard<'_, TurtleState> {
        self.world.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
