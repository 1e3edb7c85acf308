//! Terminal "game renderer" module.
//!
//! A small rendering layer for terminal play: views draw into a plain
//! framebuffer, and the renderer flushes only what changed between frames. No
//! widget toolkit is involved, so tile geometry (columns x rows per tile) is under
//! direct control.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_2048_core as core;
pub use tui_2048_store as store;
pub use tui_2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, HudInfo, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
