use tui_2048_types::{Position, Tile, GRID_SIZE};

use crate::session::SessionState;

/// A merge score popup, visible until `expires_at_ms` on the session clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScorePopup {
    pub value: u32,
    pub position: Position,
    pub expires_at_ms: u64,
}

/// Read-only view of a session for rendering
///
/// Tiles are listed with their ids and flags so a front end can diff successive
/// snapshots by id for animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub tiles: Vec<Tile>,
    pub grid_size: usize,
    pub score: u32,
    pub state: SessionState,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub elapsed_time_ms: u64,
    pub generation: u64,
    pub popups: Vec<ScorePopup>,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.grid_size = GRID_SIZE;
        self.score = 0;
        self.state = SessionState::NotStarted;
        self.is_game_over = false;
        self.is_paused = false;
        self.elapsed_time_ms = 0;
        self.generation = 0;
        self.popups.clear();
    }

    pub fn playable(&self) -> bool {
        !self.is_game_over && !self.is_paused
    }

    /// Largest value among tiles that occupy a cell
    pub fn max_tile_value(&self) -> u32 {
        self.tiles
            .iter()
            .filter(|t| !t.is_merging)
            .map(|t| t.value)
            .max()
            .unwrap_or(0)
    }

    /// Live tile at a position, ignoring fading merge sources
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.tiles
            .iter()
            .find(|t| t.position == pos && !t.is_merging)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        let mut s = Self {
            tiles: Vec::new(),
            grid_size: GRID_SIZE,
            score: 0,
            state: SessionState::NotStarted,
            is_game_over: false,
            is_paused: false,
            elapsed_time_ms: 0,
            generation: 0,
            popups: Vec::new(),
        };
        s.clear();
        s
    }
}
