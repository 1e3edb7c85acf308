//! Terminal 2048 runner (default binary).
//!
//! crossterm for input, the framebuffer renderer for output. Logging is off
//! unless `TUI2048_LOG` names a file; stderr would draw over the game.

use std::fs::File;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use env_logger::{Env, Target};
use log::{info, warn};

use tui_2048::app::{App, Flow};
use tui_2048::core::{GameSession, SystemClock};
use tui_2048::store::{data_dir, HistoryStore, Settings};
use tui_2048::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_2048::types::TICK_MS;

fn main() -> Result<()> {
    init_logging()?;
    let settings = Settings::from_env().context("loading settings")?;

    let dir = match data_dir() {
        Ok(dir) => Some(dir),
        Err(e) => {
            warn!("{e}; history and settings will not be saved");
            None
        }
    };

    let seed = settings.seed.unwrap_or_else(time_seed);
    info!("seed {seed}, grid {}", settings.grid_size);
    let session = GameSession::with_clock(settings.grid_size, seed, SystemClock::new());
    let history = dir.as_deref().map(HistoryStore::in_dir);
    let mut app = App::new(session, settings, history);
    if let Some(dir) = dir {
        app = app.with_settings_dir(dir);
    }
    app.start();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("TUI2048_LOG").filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.to_string_lossy()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, app: &mut App) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let tick = Duration::from_millis(TICK_MS);
    let mut last_tick = Instant::now();
    let mut dirty = true;

    loop {
        if dirty {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            app.render_into(&view, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
            dirty = false;
        }

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let ev = event::read()?;
            if let Event::Resize(..) = ev {
                term.invalidate();
            }
            if app.handle_event(&ev) == Flow::Quit {
                return Ok(());
            }
            if app.take_bell() {
                term.bell()?;
            }
            dirty = true;
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            // The clock panel advances every frame while playing.
            dirty |= app.tick() || app.session().state().is_playing();
        }
    }
}
