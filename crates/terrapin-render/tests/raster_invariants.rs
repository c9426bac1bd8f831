use terrapin_core::{Color, Position, TerrapinConfig, TurtleState};
use terrapin_render::{Rgba8, render_frame};

const SIZE: u32 = 64;

fn turtle_with(config: TerrapinConfig) -> TurtleState {
    TurtleState::new(config).expect("turtle")
}

fn turtle() -> TurtleState {
    turtle_with(TerrapinConfig::default())
}

#[test]
fn empty_hidden_scene_renders_a_blank_frame() {
    let mut t = turtle();
    t.set_visible(false);

    let frame = render_frame(&t, SIZE, SIZE);
    assert_eq!(frame.painted_count(), 0);
}

#[test]
fn empty_visible_scene_paints_only_the_body_icon() {
    let t = turtle();
    let frame = render_frame(&t, SIZE, SIZE);

    assert!(frame.painted_count() > 0, "body icon visible at the anchor");
    // The icon is a small template around the center; the frame corners
    // stay untouched.
    assert_eq!(frame.pixel(0, 0), Some(frame.background()));
    assert_eq!(
        frame.pixel(SIZE as usize - 1, SIZE as usize - 1),
        Some(frame.background())
    );
    assert_ne!(frame.pixel(32, 32), Some(frame.background()), "center filled");
}

#[test]
fn rendering_twice_produces_identical_pixels() {
    let mut t = turtle();
    t.turn(45.0);
    t.advance(20.0);

    let first = render_frame(&t, SIZE, SIZE);
    let second = render_frame(&t, SIZE, SIZE);
    assert_eq!(first.pixels(), second.pixels());
}

#[test]
fn trail_is_anchored_at_the_surface_center() {
    let mut t = turtle();
    t.advance(10.0);
    t.set_visible(false);

    let frame = render_frame(&t, SIZE, SIZE);
    let white = Rgba8::from_color(Color::WHITE);
    for x in 32..=42 {
        assert_eq!(frame.pixel(x, 32), Some(white), "trail pixel at x={x}");
    }
    assert_eq!(frame.pixel(44, 32), Some(frame.background()));
}

#[test]
fn zoom_scales_the_trail_around_the_anchor() {
    let config = TerrapinConfig {
        zoom: 2.0,
        ..TerrapinConfig::default()
    };
    let mut t = turtle_with(config);
    t.advance(5.0);
    t.set_visible(false);

    let frame = render_frame(&t, SIZE, SIZE);
    let white = Rgba8::from_color(Color::WHITE);
    assert_eq!(frame.pixel(42, 32), Some(white), "5 units × zoom 2 = 10 px");
}

#[test]
fn fixed_anchor_moves_the_origin() {
    let config = TerrapinConfig {
        anchor: Some(Position::new(8.0, 8.0)),
        ..TerrapinConfig::default()
    };
    let mut t = turtle_with(config);
    t.advance(4.0);
    t.set_visible(false);

    let frame = render_frame(&t, SIZE, SIZE);
    let white = Rgba8::from_color(Color::WHITE);
    assert_eq!(frame.pixel(8, 8), Some(white));
    assert_eq!(frame.pixel(12, 8), Some(white));
    assert_eq!(frame.pixel(32, 32), Some(frame.background()));
}

#[test]
fn off_surface_trail_is_clipped_not_fatal() {
    let mut t = turtle();
    t.advance(10_000.0);
    t.set_visible(false);

    let frame = render_frame(&t, SIZE, SIZE);
    // Only the on-surface half of the row can be painted.
    assert!(frame.painted_count() <= SIZE as usize);
}
