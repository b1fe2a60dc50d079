//! Entrypoint: parses CLI arguments into a [`core_config::Config`], builds
//! the grid, and dispatches to silent or graphic mode.

use std::io;
use std::path::Path;
use std::sync::Once;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use core_config::{Args, Config, SimMode};
use core_events::EventFlags;
use core_grid::{CellState, EdgePolicy, Grid};
use core_input::{InputParser, Key, ReadOutcome};
use core_render::{OutputBuffer, View};
use core_terminal::TerminalGuard;

const MODE_PAUSE: &str = "PAUSED  ";
const MODE_SIMULATE: &str = "RUNNING ";
const MODE_COMPLETED: &str = "COMPLETE";

fn configure_logging() -> Option<WorkerGuard> {
    let log_path = Path::new("cells.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never(".", "cells.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn init_grid(config: &Config) -> Result<Grid> {
    match &config.input_file {
        Some(path) => {
            core_config::load(path).context("failed to load grid from input file")
        }
        None => {
            Grid::make(config.chunk_rows, config.chunk_cols).context("failed to allocate grid")
        }
    }
}

fn advance(grid: &mut Grid, edge_policy: EdgePolicy) -> Result<(), core_grid::GridError> {
    match edge_policy {
        EdgePolicy::Bounded => grid.update(),
        EdgePolicy::Toroidal => grid.update_toroidal(),
    }
}

fn silent_mode(grid: &mut Grid, config: &Config) -> Result<()> {
    for step in 0..config.steps {
        advance(grid, config.edge_policy)
            .with_context(|| format!("tick {step} failed to advance the grid"))?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Pause,
    Simulate,
    Completed,
}

impl Mode {
    fn label(self) -> &'static str {
        match self {
            Mode::Pause => MODE_PAUSE,
            Mode::Simulate => MODE_SIMULATE,
            Mode::Completed => MODE_COMPLETED,
        }
    }
}

enum LoopStatus {
    Continue,
    Finish,
}

struct Controller {
    view: View,
    mode: Mode,
    brush: CellState,
    events: EventFlags,
    last_tick: Instant,
    step: usize,
    first_paint: bool,
}

impl Controller {
    fn new(config: &Config, rows: usize, cols: usize) -> Self {
        Self {
            view: View::new(
                rows,
                cols,
                config.shape_dead.clone(),
                config.shape_alive.clone(),
                config.shape_len,
                config.color_light,
                config.color_dark,
            ),
            mode: Mode::Pause,
            brush: CellState::Alive,
            events: EventFlags::REDRAW,
            last_tick: Instant::now(),
            step: 0,
            first_paint: true,
        }
    }

    fn next_generation(&mut self, grid: &mut Grid, config: &Config) -> Result<()> {
        if config.steps != 0 && self.step >= config.steps as usize {
            return Ok(());
        }

        advance(grid, config.edge_policy)?;

        self.step += 1;
        if self.step == config.steps as usize {
            self.mode = Mode::Completed;
        }

        self.events.insert(EventFlags::REDRAW);
        Ok(())
    }

    fn handle_tick(&mut self, grid: &mut Grid, config: &Config) -> Result<()> {
        if self.mode != Mode::Simulate {
            return Ok(());
        }
        self.next_generation(grid, config)
    }

    fn handle_pause(&mut self) {
        if self.mode == Mode::Completed {
            return;
        }
        self.mode = if self.mode == Mode::Simulate {
            Mode::Pause
        } else {
            Mode::Simulate
        };
        self.events.insert(EventFlags::REDRAW);
    }

    fn handle_frame(&mut self, grid: &mut Grid, config: &Config) -> Result<()> {
        if self.mode != Mode::Pause {
            return Ok(());
        }
        self.next_generation(grid, config)
    }

    fn handle_press(&mut self, grid: &mut Grid, input: &mut InputParser) {
        let (row, col) = input.mouse_pos();
        let (gr, gc) = grid.dim();
        let Some((row, col)) = self.view.translate_mouse(gr, gc, row, col) else {
            return;
        };
        let Ok(state) = grid.cell_state(row, col) else {
            input.cancel_press();
            return;
        };

        self.brush = match state {
            CellState::Alive => CellState::Dead,
            CellState::Dead => CellState::Alive,
        };

        let result = match self.brush {
            CellState::Alive => grid.set_alive(row, col),
            CellState::Dead => grid.set_dead(row, col),
        };
        if result.is_ok() {
            self.events.insert(EventFlags::REDRAW);
        }
    }

    fn handle_drag(&mut self, grid: &mut Grid, input: &InputParser) {
        let (row, col) = input.mouse_pos();
        let (gr, gc) = grid.dim();
        let Some((row, col)) = self.view.translate_mouse(gr, gc, row, col) else {
            return;
        };

        let result = match self.brush {
            CellState::Alive => grid.set_alive(row, col),
            CellState::Dead => grid.set_dead(row, col),
        };
        if result.is_ok() {
            self.events.insert(EventFlags::REDRAW);
        }
    }

    fn handle_key(
        &mut self,
        key: Key,
        grid: &mut Grid,
        config: &Config,
        input: &mut InputParser,
    ) -> Result<LoopStatus> {
        if self.mode == Mode::Completed {
            return Ok(if key == Key::Exit {
                LoopStatus::Finish
            } else {
                LoopStatus::Continue
            });
        }

        match key {
            Key::Pause => self.handle_pause(),
            Key::Exit => return Ok(LoopStatus::Finish),
            Key::MousePress { .. } => self.handle_press(grid, input),
            Key::MouseDrag { .. } => self.handle_drag(grid, input),
            Key::MouseRelease { .. } => {}
            Key::Randomize => {
                grid.randomize()?;
                self.events.insert(EventFlags::REDRAW);
            }
            Key::Clear => {
                grid.clear();
                self.events.insert(EventFlags::REDRAW);
            }
            Key::Frame => self.handle_frame(grid, config)?,
        }

        Ok(LoopStatus::Continue)
    }

    fn paint(&mut self, out: &mut OutputBuffer, grid: &Grid, config: &Config, redraw: bool) -> Result<()> {
        self.view
            .paint_grid(out, grid, self.step, config.steps as usize, self.mode.label(), redraw)?;
        if self.first_paint {
            self.view.after_first_grid(out);
            self.first_paint = false;
        }
        Ok(())
    }

    fn run(&mut self, grid: &mut Grid, config: &Config, guard: &mut TerminalGuard) -> Result<()> {
        let mut out = OutputBuffer::new();
        let mut input = InputParser::new();

        loop {
            let redraw = self.events.test_and_clear(EventFlags::REDRAW);
            let resize = self.events.test_and_clear(EventFlags::RESIZE);
            if redraw {
                self.paint(&mut out, grid, config, resize)?;
                out.dump(&mut io::stdout())?;
            }

            let ready =
                guard.wait(self.last_tick, Duration::from_millis(config.delay_ms as u64))?;
            if ready.stdin {
                self.events.insert(EventFlags::INPUT);
            }
            if ready.winch {
                guard.drain_winch();
                self.events.insert(EventFlags::WINCH);
            }

            let now = Instant::now();
            if now.duration_since(self.last_tick) >= Duration::from_millis(config.delay_ms as u64)
            {
                self.last_tick = now;
                self.events.insert(EventFlags::TICK);
            }

            if self.events.test_and_clear(EventFlags::WINCH) {
                let (rows, cols) = core_terminal::winsize()?;
                if self.view.update_dims(rows, cols) {
                    self.events.insert(EventFlags::REDRAW);
                    self.events.insert(EventFlags::RESIZE);
                }
            }

            if self.events.test_and_clear(EventFlags::TICK) {
                self.handle_tick(grid, config)?;
            }

            if self.events.test_and_clear(EventFlags::INPUT) {
                loop {
                    match input.parse_next(&mut io::stdin())? {
                        ReadOutcome::NewKey(key) => {
                            if let LoopStatus::Finish =
                                self.handle_key(key, grid, config, &mut input)?
                            {
                                return Ok(());
                            }
                        }
                        ReadOutcome::Continue => continue,
                        ReadOutcome::Finished => break,
                    }
                }
            }
        }
    }
}

fn graphic_mode(grid: &mut Grid, config: &Config) -> Result<()> {
    let mut guard = TerminalGuard::enter().context("failed to prepare the terminal")?;
    let (rows, cols) = core_terminal::winsize().context("failed to query terminal size")?;

    let mut controller = Controller::new(config, rows, cols);
    let mut out = OutputBuffer::new();
    controller.view.init(&mut out);
    out.dump(&mut io::stdout())?;

    let result = controller.run(grid, config, &mut guard);

    let mut out = OutputBuffer::new();
    controller.view.finish(&mut out);
    out.dump(&mut io::stdout())?;

    result
}

fn main() -> Result<()> {
    let guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = Config::try_from(args).context("invalid configuration")?;

    let mut grid = init_grid(&config)?;

    let status = match config.mode {
        SimMode::Silent => silent_mode(&mut grid, &config),
        SimMode::Graphic => graphic_mode(&mut grid, &config),
    };

    if status.is_ok() {
        if let Some(path) = &config.output_file {
            core_config::save(&grid, path).context("failed to save grid to output file")?;
        }
    }

    drop(guard);
    status
}
