//! Application controller: routes terminal events to the session and keeps the
//! history and settings files in sync.
//!
//! Nothing here touches the terminal, so the whole input-to-state path can be
//! driven from tests with a [`ManualClock`](crate::core::ManualClock).

use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use log::{info, warn};

use crate::core::{Clock, GameSession, MoveOutcome, SystemClock};
use crate::input::{handle_key_event, is_history_key, settings_action, should_quit, DragTracker};
use crate::store::{HistoryStats, HistoryStore, Settings};
use crate::term::{FrameBuffer, GameView, HudInfo, Viewport};
use crate::types::{GameAction, GameSummary, SettingsAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Game,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<C: Clock = SystemClock> {
    session: GameSession<C>,
    settings: Settings,
    /// Where sound changes are saved; `None` keeps them for this run only.
    settings_dir: Option<PathBuf>,
    /// `None` when no data directory is available; games are then not recorded.
    history: Option<HistoryStore>,
    entries: Vec<GameSummary>,
    stats: HistoryStats,
    screen: Screen,
    drag: DragTracker,
    bell_pending: bool,
}

impl<C: Clock> App<C> {
    pub fn new(session: GameSession<C>, settings: Settings, history: Option<HistoryStore>) -> Self {
        let entries = match history.as_ref().map(HistoryStore::load) {
            Some(Ok(entries)) => entries,
            Some(Err(e)) => {
                warn!("history unavailable: {e}");
                Vec::new()
            }
            None => Vec::new(),
        };
        let stats = HistoryStats::from_entries(&entries);
        Self {
            session,
            settings,
            settings_dir: None,
            history,
            entries,
            stats,
            screen: Screen::Game,
            drag: DragTracker::default(),
            bell_pending: false,
        }
    }

    /// Save sound changes to `settings.json` in `dir`
    pub fn with_settings_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings_dir = Some(dir.into());
        self
    }

    pub fn session(&self) -> &GameSession<C> {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn history(&self) -> &[GameSummary] {
        &self.entries
    }

    pub fn stats(&self) -> HistoryStats {
        self.stats
    }

    pub fn hud(&self) -> HudInfo {
        HudInfo {
            best_score: self.stats.best_score,
            games_played: self.stats.games_played,
            sound_on: self.settings.sound_audible(),
            volume_pct: self.settings.volume_pct(),
        }
    }

    pub fn start(&mut self) {
        self.session.start_game();
    }

    /// Whether a sound cue fired since the last call
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    pub fn handle_event(&mut self, event: &Event) -> Flow {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Mouse(mouse) if self.screen == Screen::Game => {
                if let Some(dir) = self.drag.handle(mouse) {
                    self.apply(GameAction::Move(dir));
                }
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if should_quit(key) {
            return Flow::Quit;
        }
        if is_history_key(key) {
            self.toggle_history();
            return Flow::Continue;
        }
        if let Some(action) = settings_action(key) {
            self.change_settings(action);
            return Flow::Continue;
        }

        match self.screen {
            Screen::Game => {
                if let Some(action) = handle_key_event(key) {
                    self.apply(action);
                }
            }
            Screen::History => {
                if matches!(key.code, KeyCode::Char('c' | 'C')) {
                    self.clear_history();
                }
            }
        }
        Flow::Continue
    }

    /// Apply an action to the session and record the game if it just ended
    pub fn apply(&mut self, action: GameAction) {
        match action {
            GameAction::Move(dir) => {
                let outcome = self.session.apply_move(dir);
                self.on_move(&outcome);
            }
            GameAction::Pause => {
                self.session.toggle_pause();
            }
            GameAction::Restart => {
                self.drag.reset();
                self.session.start_game();
            }
        }
        self.record_finished_game();
    }

    fn on_move(&mut self, outcome: &MoveOutcome) {
        if outcome.cue.is_some() && self.settings.sound_audible() {
            self.bell_pending = true;
        }
    }

    /// Run time-driven session work; returns true if a redraw is needed
    pub fn tick(&mut self) -> bool {
        let changed = self.session.tick();
        self.record_finished_game();
        changed
    }

    fn record_finished_game(&mut self) {
        let Some(summary) = self.session.take_summary() else {
            return;
        };
        match &self.history {
            Some(store) => match store.append(summary) {
                Ok(entries) => self.entries = entries,
                Err(e) => {
                    warn!("failed to record game: {e}");
                    self.entries.insert(0, summary);
                }
            },
            None => self.entries.insert(0, summary),
        }
        self.stats = HistoryStats::from_entries(&self.entries);
    }

    /// Apply a sound preference change and persist it
    pub fn change_settings(&mut self, action: SettingsAction) {
        self.settings.apply(action);
        let Some(dir) = &self.settings_dir else {
            return;
        };
        if let Err(e) = self.settings.save_sound(dir) {
            warn!("failed to save settings: {e}");
        }
    }

    fn toggle_history(&mut self) {
        self.screen = match self.screen {
            Screen::Game => {
                // Leaving the board pauses a running game.
                self.session.pause_game();
                Screen::History
            }
            Screen::History => Screen::Game,
        };
    }

    fn clear_history(&mut self) {
        if let Some(store) = &self.history {
            if let Err(e) = store.clear() {
                warn!("failed to clear history: {e}");
                return;
            }
        }
        info!("history cleared");
        self.entries.clear();
        self.stats = HistoryStats::default();
    }

    pub fn render_into(&self, view: &GameView, viewport: Viewport, fb: &mut FrameBuffer) {
        match self.screen {
            Screen::Game => view.render_into(&self.session.snapshot(), &self.hud(), viewport, fb),
            Screen::History => view.render_history_into(&self.entries, &self.stats, viewport, fb),
        }
    }
}
