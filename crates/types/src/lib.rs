//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no behavior beyond small conversions, making them
//! usable in any context (core logic, terminal rendering, history persistence).
//!
//! # Grid Geometry
//!
//! The standard game uses a 4x4 grid. Positions are `(row, col)` with row 0 at the
//! top and column 0 at the left. The core accepts grid sizes from 2 to
//! `MAX_GRID_SIZE` (5).
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MERGE_SETTLE_MS` | 150 | Fade-out window before merged source tiles are purged |
//! | `SCORE_POPUP_MS` | 3000 | How long a merge score popup stays visible |
//! | `TICK_MS` | 16 | Front-end frame interval (~60 FPS) |
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{Direction, GameAction, Position, GRID_SIZE};
//!
//! let dir = Direction::from_str("left").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.delta(), (0, -1));
//!
//! let pos = Position::new(0, 1);
//! assert_eq!(pos.step(Direction::Left, GRID_SIZE), Some(Position::new(0, 0)));
//! assert_eq!(pos.step(Direction::Up, GRID_SIZE), None);
//!
//! assert_eq!(GameAction::from_str("moveUp"), Some(GameAction::Move(Direction::Up)));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid side length of the standard game (4x4)
pub const GRID_SIZE: usize = 4;

/// Largest supported grid side; on bigger boards tile values can outgrow `u32`
pub const MAX_GRID_SIZE: usize = 5;

/// Number of random tiles placed by a fresh game
pub const INITIAL_TILES: usize = 2;

/// Probability that a spawned tile is a 4 instead of a 2
pub const FOUR_PROBABILITY: f64 = 0.1;

/// Delay before tiles flagged `is_merging` are removed (150ms)
pub const MERGE_SETTLE_MS: u64 = 150;

/// Lifetime of a merge score popup (3000ms)
pub const SCORE_POPUP_MS: u64 = 3000;

/// Front-end frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u64 = 16;

/// The four swipe directions
///
/// Gesture recognition and key mapping reduce raw input to one of these before
/// it reaches the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in a fixed order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector `(d_row, d_col)` for this direction
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::Direction;
    ///
    /// assert_eq!(Direction::Up.delta(), (-1, 0));
    /// assert_eq!(Direction::Down.delta(), (1, 0));
    /// assert_eq!(Direction::Left.delta(), (0, -1));
    /// assert_eq!(Direction::Right.delta(), (0, 1));
    /// ```
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether this position lies on a `grid_size` x `grid_size` grid
    pub fn in_bounds(&self, grid_size: usize) -> bool {
        self.row < grid_size && self.col < grid_size
    }

    /// The neighboring cell one step in `direction`, if it is on the grid
    pub fn step(&self, direction: Direction, grid_size: usize) -> Option<Position> {
        let next = match direction {
            Direction::Up => Position::new(self.row.checked_sub(1)?, self.col),
            Direction::Down => Position::new(self.row + 1, self.col),
            Direction::Left => Position::new(self.row, self.col.checked_sub(1)?),
            Direction::Right => Position::new(self.row, self.col + 1),
        };
        next.in_bounds(grid_size).then_some(next)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Opaque tile identity
///
/// Ids are unique within a session and never reused. A tile keeps its id while it
/// slides; spawning or merging produces a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A numbered, positioned game piece
///
/// The three flags are presentation hints for the move that produced this tile:
/// - **is_new**: spawned by this move
/// - **is_merged**: produced by a merge during this move
/// - **is_merging**: a merge source fading out; it shares its cell with the merge
///   result until the session settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub position: Position,
    pub is_new: bool,
    pub is_merged: bool,
    pub is_merging: bool,
}

impl Tile {
    /// A freshly spawned tile
    pub fn spawned(id: TileId, value: u32, position: Position) -> Self {
        Self {
            is_new: true,
            ..Self::settled(id, value, position)
        }
    }

    /// A tile with no presentation flags set
    pub fn settled(id: TileId, value: u32, position: Position) -> Self {
        Self {
            id,
            value,
            position,
            is_new: false,
            is_merged: false,
            is_merging: false,
        }
    }

    /// Tile values are powers of two, starting at 2
    pub fn is_valid_value(value: u32) -> bool {
        value >= 2 && value.is_power_of_two()
    }

    pub fn clear_flags(&mut self) {
        self.is_new = false;
        self.is_merged = false;
        self.is_merging = false;
    }
}

/// A merge that happened during a move
///
/// `value` is the value of the resulting tile and `position` is where it sits.
/// Used for score popups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeEvent {
    pub value: u32,
    pub position: Position,
}

/// Feedback sound requested by a board-changing move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Tiles slid without merging
    Move,
    /// At least one merge happened
    Merge,
}

/// Record emitted when a game ends, persisted by the history store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: u32,
    pub elapsed_time_ms: u64,
    pub max_tile_value: u32,
    /// Wall-clock time the game ended, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

/// Game actions that can be applied to a session
///
/// These are produced by key mapping and gesture reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Slide all tiles in a direction
    Move(Direction),
    /// Toggle pause state
    Pause,
    /// Discard the current game and start a new one
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::Move(Direction::Left)));
    /// assert_eq!(GameAction::from_str("pause"), Some(GameAction::Pause));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" => Some(GameAction::Move(Direction::Up)),
            "movedown" => Some(GameAction::Move(Direction::Down)),
            "moveleft" => Some(GameAction::Move(Direction::Left)),
            "moveright" => Some(GameAction::Move(Direction::Right)),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Move(Direction::Up) => "moveUp",
            GameAction::Move(Direction::Down) => "moveDown",
            GameAction::Move(Direction::Left) => "moveLeft",
            GameAction::Move(Direction::Right) => "moveRight",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Preference changes made from the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    ToggleSound,
    VolumeUp,
    VolumeDown,
}
