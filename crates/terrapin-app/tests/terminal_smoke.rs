use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn run_headless_demo(demo: &str, report_path: &std::path::Path) {
    let bin = env!("CARGO_BIN_EXE_terrapin");
    let status = Command::new(bin)
        .args(["--demo", demo])
        .env("TERRAPIN_TERMINAL_HEADLESS", "1")
        .env("TERRAPIN_TERMINAL_REPORT", report_path)
        .env("RUST_LOG", "off")
        .status()
        .expect("failed to run terrapin binary");
    assert!(status.success(), "terminal headless run failed for {demo}");
}

fn read_report(path: &std::path::Path) -> serde_json::Value {
    let raw = fs::read_to_string(path).expect("headless report missing");
    serde_json::from_str(&raw).expect("headless report parses")
}

#[test]
fn headless_walk_reports_the_expected_scene() {
    let dir = tempdir().expect("tempdir");
    let report_path = dir.path().join("walk.json");
    run_headless_demo("walk", &report_path);

    let report = read_report(&report_path);
    assert_eq!(report["steps"], 5);
    assert_eq!(report["segments_drawn"], 3);
    assert_eq!(report["visible"], false, "walk ends with the turtle hidden");

    let final_x = report["final_x"].as_f64().expect("final_x");
    let final_y = report["final_y"].as_f64().expect("final_y");
    assert!((final_x - 25.0).abs() < 1e-6, "got x={final_x}");
    assert!((final_y - 50.0).abs() < 1e-6, "got y={final_y}");

    assert!(report["frames"].as_u64().expect("frames") >= 1);
    assert!(
        report["painted_pixels"].as_u64().expect("painted_pixels") > 0,
        "the hidden turtle still leaves its trail"
    );
}

#[test]
fn headless_square_returns_to_the_origin() {
    let dir = tempdir().expect("tempdir");
    let report_path = dir.path().join("square.json");
    run_headless_demo("square", &report_path);

    let report = read_report(&report_path);
    assert_eq!(report["steps"], 8);
    assert_eq!(report["segments_drawn"], 4);
    assert_eq!(report["visible"], true);

    let final_x = report["final_x"].as_f64().expect("final_x");
    let final_y = report["final_y"].as_f64().expect("final_y");
    assert!(final_x.abs() < 1e-6, "got x={final_x}");
    assert!(final_y.abs() < 1e-6, "got y={final_y}");

    let heading = report["final_heading_degrees"]
        .as_f64()
        .expect("final_heading_degrees");
    assert!((heading - 360.0).abs() < 1e-6, "four left turns accumulate");
}
