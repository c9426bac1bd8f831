use std::fs;
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use terrapin_app::{TerminalRenderer, Turtle, launch, terminal};
use terrapin_core::TerrapinConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "terrapin",
    version,
    about = "Replay-based turtle graphics in the terminal"
)]
struct Cli {
    /// Pacing delay between turtle commands, in milliseconds.
    #[arg(long)]
    pace_ms: Option<u64>,

    /// Uniform zoom applied to the scene around the anchor.
    #[arg(long)]
    zoom: Option<f64>,

    /// Optional JSON configuration file overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Demo sequence to walk.
    #[arg(long, value_enum, default_value_t = Demo::Walk)]
    demo: Demo,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Demo {
    /// The classic sample walk, ending with the turtle hidden.
    Walk,
    /// Four sides, four left turns.
    Square,
    /// A five-pointed star.
    Star,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let headless = std::env::var_os(terminal::HEADLESS_ENV).is_some();
    let config = build_config(&cli, headless)?;

    let session = launch(config, TerminalRenderer::default())?;
    run_demo(session.turtle(), cli.demo);

    if headless {
        session.turtle().close();
    }
    session.wait()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_config(cli: &Cli, headless: bool) -> Result<TerrapinConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => TerrapinConfig::default(),
    };
    if let Some(pace_ms) = cli.pace_ms {
        config.step_delay_ms = pace_ms;
    }
    if headless {
        // Nobody is watching; pacing would only delay the report.
        config.step_delay_ms = 0;
    }
    if let Some(zoom) = cli.zoom {
        config.zoom = zoom;
    }
    Ok(config)
}

fn run_demo(turtle: &Turtle, demo: Demo) {
    info!(?demo, "running demo sequence");
    match demo {
        Demo::Walk => {
            turtle.turn_left(90.0);
            turtle.forward(50.0);
            turtle.turn_right(90.0);
            turtle.backward(25.0);
            turtle.forward(50.0);
            pause(turtle);
            turtle.hide();
        }
        Demo::Square => {
            for _ in 0..4 {
                turtle.forward(40.0);
                turtle.turn_left(90.0);
            }
        }
        Demo::Star => {
            for _ in 0..5 {
                turtle.forward(60.0);
                turtle.turn_right(144.0);
            }
            pause(turtle);
            turtle.hide();
        }
    }
}

// A beat before hiding the turtle, so the finished trail is seen with the
// body still on it. Scales with pacing and vanishes when pacing is off.
fn pause(turtle: &Turtle) {
    let pace = turtle.pace();
    if !pace.is_zero() {
        thread::sleep(pace * 2);
    }
}
