//! Terminal input module (engine-facing).
//!
//! Independent of any UI framework: maps `crossterm` key events into
//! [`crate::types::GameAction`] or [`crate::types::SettingsAction`] and reduces
//! raw drag vectors (mouse drags in the terminal, touch swipes elsewhere) to a
//! [`crate::types::Direction`].

pub mod gesture;
pub mod map;

pub use tui_2048_types as types;

pub use gesture::{direction_from_drag, DragTracker, SWIPE_THRESHOLD};
pub use map::{handle_key_event, is_history_key, settings_action, should_quit};
