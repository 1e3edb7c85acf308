//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the 2048 rules and the session state machine. It has no
//! dependencies on terminal I/O or persistence, making it:
//!
//! - **Deterministic**: the same seed produces identical games
//! - **Testable**: time comes from a [`Clock`], so timing is driven by hand in tests
//! - **Portable**: runs headless, in the terminal front end, or in benchmarks
//!
//! # Module Structure
//!
//! - [`board`]: square grid with tile set and O(1) occupancy
//! - [`engine`]: the slide-and-merge transform
//! - [`spawner`]: random 2/4 tile placement
//! - [`terminal`]: game-over detection
//! - [`session`]: lifecycle, score, timer, settle scheduling
//! - [`snapshot`]: read-only view for renderers
//! - [`clock`]: system and manual time sources
//!
//! # Game Rules
//!
//! - Tiles slide as far as they can towards the chosen edge
//! - Two equal tiles that meet merge into one of double value, once per move
//! - The merged value is added to the score
//! - Every move that changes the board spawns a 2 (90%) or a 4 (10%)
//! - The game ends when the board is full and no adjacent tiles are equal
//!
//! # Example
//!
//! ```
//! use tui_2048_core::{GameSession, ManualClock};
//! use tui_2048_types::Direction;
//!
//! let mut game = GameSession::with_clock(4, 12345, ManualClock::new());
//! game.start_game();
//! assert_eq!(game.tiles().len(), 2);
//!
//! for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
//!     game.apply_move(dir);
//! }
//! assert!(game.board().check_invariants());
//! ```

pub mod board;
pub mod clock;
pub mod engine;
pub mod session;
pub mod snapshot;
pub mod spawner;
pub mod terminal;

pub use tui_2048_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, TileIds};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{apply_move, can_move, MoveResult};
pub use session::{GameSession, MoveOutcome, SessionState, SettleTicket};
pub use snapshot::{ScorePopup, SessionSnapshot};
pub use spawner::{spawn, spawn_into, spawn_value};
pub use terminal::{has_adjacent_pair, is_terminal};
