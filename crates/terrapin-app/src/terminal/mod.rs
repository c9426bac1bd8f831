//! Terminal renderer: an interactive crossterm/ratatui front-end plus a
//! headless offscreen mode for CI runs.

use std::{
    fs,
    io::{self, Stdout},
    path::{Path, PathBuf},
    sync::PoisonError,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color as TermColor, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use serde::Serialize;
use supports_color::{Stream, on_cached};
use terrapin_core::{Step, TurtleState};
use terrapin_render::{PixelCanvas, Rgba8, render_frame};
use tracing::info;

use crate::SharedTurtle;
use crate::renderer::{Renderer, RendererContext};
use crate::signal::drain_pending_signals;

/// Environment switch selecting the headless offscreen mode.
pub const HEADLESS_ENV: &str = "TERRAPIN_TERMINAL_HEADLESS";
/// Optional path the headless mode writes its JSON report to.
pub const REPORT_ENV: &str = "TERRAPIN_TERMINAL_REPORT";
/// Optional override for the headless iteration budget.
pub const HEADLESS_FRAMES_ENV: &str = "TERRAPIN_TERMINAL_HEADLESS_FRAMES";

const UI_TICK_MILLIS: u64 = 50;
const DEFAULT_HEADLESS_FRAMES: usize = 600;
const MAX_HEADLESS_FRAMES: usize = 36_000;
const HEADLESS_POLL_MILLIS: u64 = 5;
const HEADLESS_SURFACE: (u32, u32) = (80, 48);

pub struct TerminalRenderer {
    draw_interval: Duration,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self {
            draw_interval: Duration::from_millis(UI_TICK_MILLIS),
        }
    }
}

impl Renderer for TerminalRenderer {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn run(&self, ctx: RendererContext) -> Result<()> {
        if std::env::var_os(HEADLESS_ENV).is_some() {
            let report = self.run_headless(ctx)?;
            info!(
                target: "terrapin::terminal",
                frames = report.frames,
                steps = report.steps,
                segments = report.segments_drawn,
                "terminal headless run completed"
            );
            return Ok(());
        }

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to build terminal backend")?;
        terminal.hide_cursor().ok();

        // Surface is up; release the controller.
        ctx.ready.send(()).ok();

        let result = run_event_loop(self, &mut terminal, &ctx);

        terminal.show_cursor().ok();
        if let Err(err) = disable_raw_mode() {
            tracing::error!(?err, "failed to disable raw mode");
        }
        if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
            tracing::error!(?err, "failed to leave alternate screen");
        }

        result
    }
}

fn run_event_loop(
    renderer: &TerminalRenderer,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ctx: &RendererContext,
) -> Result<()> {
    let palette = Palette::detect();
    let mut needs_repaint = true;
    let mut last_draw = Instant::now();

    loop {
        let drained = drain_pending_signals(&ctx.signals);
        if drained.shutdown {
            info!("shutdown signal received; leaving event loop");
            break;
        }
        needs_repaint |= drained.repaint;

        let now = Instant::now();
        if needs_repaint || now.duration_since(last_draw) >= renderer.draw_interval {
            let snapshot = lock_snapshot(&ctx.world);
            terminal.draw(|frame| draw(frame, &snapshot, &palette))?;
            last_draw = now;
            needs_repaint = false;
        }

        if event::poll(Duration::from_millis(UI_TICK_MILLIS)).unwrap_or(false) {
            match event::read()? {
                Event::Key(key) if is_quit_key(&key) => {
                    info!("quit key received; leaving event loop");
                    break;
                }
                Event::Resize(..) => needs_repaint = true,
                _ => {}
            }
        }
    }

    Ok(())
}

fn is_quit_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn lock_snapshot(world: &SharedTurtle) -> TurtleState {
    world.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

fn draw(frame: &mut Frame<'_>, snapshot: &TurtleState, palette: &Palette) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_status(frame, outer[0], snapshot);
    draw_scene(frame, outer[1], snapshot, palette);
    draw_footer(frame, outer[2]);
}

fn draw_status(frame: &mut Frame<'_>, area: Rect, snapshot: &TurtleState) {
    let pose = snapshot.position();
    let pen = if snapshot.pen_down() { "down" } else { "up" };
    let body = if snapshot.visible() { "shown" } else { "hidden" };
    let status = Line::from(vec![
        Span::styled("terrapin", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "  pos ({:+.1}, {:+.1})  heading {:+.1}°  pen {}  body {}  steps {}",
            pose.x,
            pose.y,
            snapshot.heading().to_degrees(),
            pen,
            body,
            snapshot.step_count(),
        )),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}

fn draw_scene(frame: &mut Frame<'_>, area: Rect, snapshot: &TurtleState, palette: &Palette) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    // Half-block cells pack two pixel rows per terminal row.
    let pixels = render_frame(snapshot, u32::from(area.width), u32::from(area.height) * 2);
    frame.render_widget(
        PixelImage {
            frame: &pixels,
            color: palette.color,
        },
        area,
    );
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect) {
    let hint = Paragraph::new(Line::from(Span::styled(
        " q / esc to quit",
        Style::default().add_modifier(Modifier::DIM),
    )));
    frame.render_widget(hint, area);
}

/// Terminal color capability, detected once per session.
struct Palette {
    color: bool,
}

impl Palette {
    fn detect() -> Self {
        let level = on_cached(Stream::Stdout);
        Self {
            color: level.is_some_and(|level| level.has_16m),
        }
    }
}

/// Renders a pixel grid with half-block glyphs: the upper half of each
/// cell is the even pixel row, the lower half the odd one.
struct PixelImage<'a> {
    frame: &'a PixelCanvas,
    color: bool,
}

impl Widget for PixelImage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background = self.frame.background();
        for row in 0..area.height {
            for col in 0..area.width {
                let x = usize::from(col);
                let y = usize::from(row) * 2;
                let (Some(top), Some(bottom)) = (self.frame.pixel(x, y), self.frame.pixel(x, y + 1))
                else {
                    continue;
                };

                let cell = &mut buf[(area.x + col, area.y + row)];
                if self.color {
                    cell.set_char('▀');
                    cell.set_fg(term_color(top));
                    cell.set_bg(term_color(bottom));
                } else {
                    let glyph = match (top != background, bottom != background) {
                        (true, true) => '█',
                        (true, false) => '▀',
                        (false, true) => '▄',
                        (false, false) => ' ',
                    };
                    cell.set_char(glyph);
                }
            }
        }
    }
}

fn term_color(pixel: Rgba8) -> TermColor {
    TermColor::Rgb(pixel.r, pixel.g, pixel.b)
}

/// Summary written by the headless mode for CI assertions.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    pub frames: usize,
    pub steps: usize,
    pub segments_drawn: usize,
    pub final_x: f64,
    pub final_y: f64,
    pub final_heading_degrees: f64,
    pub visible: bool,
    pub painted_pixels: usize,
}

impl HeadlessReport {
    fn from_state(state: &TurtleState, frames: usize, frame: &PixelCanvas) -> Self {
        let pose = state.replay_pose();
        let segments_drawn = state
            .steps()
            .iter()
            .filter(|step| matches!(step, Step::Advance { pen_down: true, .. }))
            .count();
        Self {
            frames,
            steps: state.step_count(),
            segments_drawn,
            final_x: pose.position.x,
            final_y: pose.position.y,
            final_heading_degrees: pose.heading.to_degrees(),
            visible: state.visible(),
            painted_pixels: frame.painted_count(),
        }
    }

    fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write headless report to {}", path.display()))?;
        Ok(())
    }
}

impl TerminalRenderer {
    fn run_headless(&self, ctx: RendererContext) -> Result<HeadlessReport> {
        let budget = headless_frame_budget();
        let (width, height) = HEADLESS_SURFACE;

        // No terminal to set up; the offscreen surface is ready at once.
        ctx.ready.send(()).ok();

        let mut frames = 0;
        for _ in 0..budget {
            let drained = drain_pending_signals(&ctx.signals);
            if drained.shutdown {
                break;
            }
            if drained.repaint {
                let snapshot = lock_snapshot(&ctx.world);
                let _ = render_frame(&snapshot, width, height);
                frames += 1;
            }
            thread::sleep(Duration::from_millis(HEADLESS_POLL_MILLIS));
        }

        // One final frame so the report always reflects the finished log.
        let snapshot = lock_snapshot(&ctx.world);
        let frame = render_frame(&snapshot, width, height);
        frames += 1;

        let report = HeadlessReport::from_state(&snapshot, frames, &frame);
        if let Some(path) = report_file_path_from_env() {
            report.write_json(&path)?;
        }
        Ok(report)
    }
}

fn report_file_path_from_env() -> Option<PathBuf> {
    std::env::var_os(REPORT_ENV).map(PathBuf::from)
}

fn headless_frame_budget() -> usize {
    std::env::var(HEADLESS_FRAMES_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .map(|value| value.min(MAX_HEADLESS_FRAMES))
        .unwrap_or(DEFAULT_HEADLESS_FRAMES)
}
