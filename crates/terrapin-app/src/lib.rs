//! Shared application plumbing for Terrapin sessions.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use terrapin_core::{TerrapinConfig, TurtleState};
use tracing::info;

pub type SharedTurtle = Arc<Mutex<TurtleState>>;

pub mod signal;
pub mod terminal;
pub mod turtle;

pub mod renderer {
    use std::sync::mpsc::SyncSender;

    use anyhow::Result;

    use crate::SharedTurtle;
    use crate::signal::SignalReceiver;

    /// Shared context passed to renderer implementations.
    pub struct RendererContext {
        pub world: SharedTurtle,
        pub signals: SignalReceiver,
        /// One-shot readiness latch. Fired exactly once, after the surface
        /// is set up and before the event loop starts; dropping it unfired
        /// reports initialization failure to the launching thread.
        pub ready: SyncSender<()>,
    }

    pub trait Renderer {
        /// Stable identifier describing the renderer implementation
        /// (e.g., "terminal").
        fn name(&self) -> &'static str;

        /// Launch the renderer; blocks until the rendering session
        /// completes.
        fn run(&self, ctx: RendererContext) -> Result<()>;
    }
}

pub use renderer::{Renderer, RendererContext};
pub use signal::{RenderSignal, SignalReceiver, SignalSender, SignalSubmit};
pub use terminal::TerminalRenderer;
pub use turtle::Turtle;

/// A running session: the controller handle plus the render thread.
///
/// One session per process: the render context owns the process's single
/// interactive terminal, so a second concurrent session is unsupported.
pub struct TurtleSession {
    turtle: Turtle,
    render_thread: JoinHandle<Result<()>>,
}

impl TurtleSession {
    #[must_use]
    pub fn turtle(&self) -> &Turtle {
        &self.turtle
    }

    /// Block until the render context exits and surface its result.
    pub fn wait(self) -> Result<()> {
        match self.render_thread.join() {
            Ok(result) => result,
            Err(_) => bail!("render thread panicked"),
        }
    }
}

/// Spawn the render context and block until its surface is ready.
///
/// The controller handle is released only after the renderer signals
/// readiness; a surface that cannot initialize aborts the launch with the
/// renderer's own error.
pub fn launch(
    config: TerrapinConfig,
    renderer: impl Renderer + Send + 'static,
) -> Result<TurtleSession> {
    let pace = Duration::from_millis(config.step_delay_ms);
    let state = TurtleState::new(config).context("invalid session configuration")?;
    let world: SharedTurtle = Arc::new(Mutex::new(state));

    let (signal_tx, signal_rx) = signal::create_signal_bus(signal::SIGNAL_QUEUE_CAPACITY);
    let submit = signal::make_signal_submit(signal_tx);

    let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel(1);
    let ctx = RendererContext {
        world: Arc::clone(&world),
        signals: signal_rx,
        ready: ready_tx,
    };

    let name = renderer.name();
    let render_thread = std::thread::Builder::new()
        .name("terrapin-render".into())
        .spawn(move || renderer.run(ctx))
        .context("failed to spawn render thread")?;

    if ready_rx.recv().is_err() {
        // The latch was dropped unfired; harvest the renderer's error.
        return match render_thread.join() {
            Ok(Ok(())) => bail!("{name} renderer exited before signalling readiness"),
            Ok(Err(err)) => Err(err.context("render context failed to initialize")),
            Err(_) => bail!("render thread panicked during initialization"),
        };
    }
    info!(renderer = name, "render context ready");

    Ok(TurtleSession {
        turtle: Turtle::new(world, submit, pace),
        render_thread,
    })
}
