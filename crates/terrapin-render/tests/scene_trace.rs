use terrapin_core::{TerrapinConfig, TurtleState, render_scene};
use terrapin_render::TraceCanvas;

const WIDTH: f64 = 200.0;
const HEIGHT: f64 = 200.0;

fn turtle() -> TurtleState {
    TurtleState::new(TerrapinConfig::default()).expect("turtle")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9
}

fn assert_segment(actual: ((f64, f64), (f64, f64)), expected: ((f64, f64), (f64, f64))) {
    let ((ax0, ay0), (ax1, ay1)) = actual;
    let ((ex0, ey0), (ex1, ey1)) = expected;
    assert!(
        approx(ax0, ex0) && approx(ay0, ey0) && approx(ax1, ex1) && approx(ay1, ey1),
        "segment {actual:?} differs from expected {expected:?}",
    );
}

/// The end-to-end walk of the sample program. Canvas coordinates flip the
/// y axis, so "up" in turtle space shows as negative y here.
#[test]
fn classic_walk_draws_exactly_three_segments() {
    let mut t = turtle();
    t.turn(90.0);
    t.advance(50.0);
    t.turn(-90.0);
    t.advance(-25.0);
    t.advance(50.0);
    t.set_visible(false);

    let mut trace = TraceCanvas::new();
    render_scene(&t, &mut trace, WIDTH, HEIGHT);

    let segments = trace.stroked_segments();
    assert_eq!(segments.len(), 3);
    assert_segment(segments[0], ((0.0, 0.0), (0.0, -50.0)));
    assert_segment(segments[1], ((0.0, -50.0), (-25.0, -50.0)));
    assert_segment(segments[2], ((-25.0, -50.0), (25.0, -50.0)));

    assert_eq!(trace.stroke_count(), 1, "one stroke for the whole trail");
    assert_eq!(trace.fill_count(), 0, "hidden turtle draws no body");
    assert_eq!(trace.arc_count(), 0);
}

#[test]
fn replaying_an_unchanged_log_is_idempotent() {
    let mut t = turtle();
    t.turn(30.0);
    t.advance(40.0);
    t.turn(60.0);
    t.advance(-10.0);

    let mut first = TraceCanvas::new();
    let mut second = TraceCanvas::new();
    render_scene(&t, &mut first, WIDTH, HEIGHT);
    render_scene(&t, &mut second, WIDTH, HEIGHT);

    assert_eq!(first.ops(), second.ops());
    assert_eq!(t.step_count(), 4, "rendering never mutates the log");
}

#[test]
fn pen_up_motion_replays_without_segments() {
    let mut t = turtle();
    t.set_pen_down(false);
    t.advance(10.0);
    t.set_pen_down(true);

    let mut trace = TraceCanvas::new();
    render_scene(&t, &mut trace, WIDTH, HEIGHT);

    assert!(
        trace.stroked_segments().is_empty(),
        "the pen was up when the step was recorded; the live flag is irrelevant",
    );
}

#[test]
fn hiding_preserves_previously_drawn_segments() {
    let mut t = turtle();
    t.advance(30.0);

    let mut shown = TraceCanvas::new();
    render_scene(&t, &mut shown, WIDTH, HEIGHT);

    t.set_visible(false);
    let mut hidden = TraceCanvas::new();
    render_scene(&t, &mut hidden, WIDTH, HEIGHT);

    assert_eq!(shown.stroked_segments(), hidden.stroked_segments());
    assert!(shown.fill_count() > 0);
    assert_eq!(hidden.fill_count(), 0);
}

#[test]
fn visible_turtle_renders_the_full_body_template() {
    let t = turtle();
    let mut trace = TraceCanvas::new();
    render_scene(&t, &mut trace, WIDTH, HEIGHT);

    assert_eq!(trace.arc_count(), 6, "body, four legs, head");
    assert_eq!(trace.fill_count(), 3);
}
