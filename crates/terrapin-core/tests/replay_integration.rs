use terrapin_core::{Step, TerrapinConfig, TurtleState};

fn turtle() -> TurtleState {
    TurtleState::new(TerrapinConfig::default()).expect("turtle")
}

fn approx(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// The classic sample walk: left 90, forward 50, right 90, back 25,
/// forward 50. Ends at (25, 50) in turtle space with heading back at 0.
fn classic_walk(t: &mut TurtleState) {
    t.turn(90.0);
    t.advance(50.0);
    t.turn(-90.0);
    t.advance(-25.0);
    t.advance(50.0);
}

#[test]
fn classic_walk_reaches_expected_pose() {
    let mut t = turtle();
    classic_walk(&mut t);

    let pose = t.replay_pose();
    assert!(
        approx(pose.position.x, 25.0, 1e-9),
        "expected x≈25.0, got {}",
        pose.position.x
    );
    assert!(
        approx(pose.position.y, 50.0, 1e-9),
        "expected y≈50.0, got {}",
        pose.position.y
    );
    assert!(
        approx(pose.heading, 0.0, 1e-9),
        "turns cancel, got heading {}",
        pose.heading
    );

    assert_eq!(t.step_count(), 5);
    let drawn = t
        .steps()
        .iter()
        .filter(|step| matches!(step, Step::Advance { pen_down: true, .. }))
        .count();
    assert_eq!(drawn, 3, "all three motions happened with the pen down");
}

#[test]
fn identical_command_sequences_replay_identically() {
    let mut a = turtle();
    let mut b = turtle();
    classic_walk(&mut a);
    classic_walk(&mut b);

    assert_eq!(a.steps(), b.steps());
    assert_eq!(a.replay_pose(), b.replay_pose());
}

#[test]
fn pen_up_window_is_frozen_into_the_log() {
    let mut t = turtle();
    t.set_pen_down(false);
    t.advance(10.0);
    t.set_pen_down(true);
    t.advance(5.0);

    // The first motion stays pen-up forever, no matter what the live flag
    // says at replay time.
    assert_eq!(
        t.steps(),
        &[
            Step::Advance {
                distance: 10.0,
                pen_down: false,
            },
            Step::Advance {
                distance: 5.0,
                pen_down: true,
            },
        ],
    );
    assert!(t.pen_down());
}

#[test]
fn hiding_never_touches_recorded_steps() {
    let mut t = turtle();
    classic_walk(&mut t);
    let before = t.steps().to_vec();

    t.set_visible(false);
    assert_eq!(t.steps(), &before[..]);
    assert!(!t.visible());

    t.set_visible(true);
    assert_eq!(t.steps(), &before[..]);
}

#[test]
fn backward_equals_forward_along_reversed_heading() {
    let mut back = turtle();
    back.advance(-40.0);

    let mut turned = turtle();
    turned.turn(180.0);
    turned.advance(40.0);

    let a = back.replay_pose().position;
    let b = turned.replay_pose().position;
    assert!(approx(a.x, b.x, 1e-9), "{} vs {}", a.x, b.x);
    assert!(approx(a.y, b.y, 1e-9), "{} vs {}", a.y, b.y);
}
