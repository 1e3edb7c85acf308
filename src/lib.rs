//! TUI 2048 (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and hosts [`app`], the
//! terminal-independent controller the binary drives.

pub mod app;

pub use tui_2048_core as core;
pub use tui_2048_input as input;
pub use tui_2048_store as store;
pub use tui_2048_term as term;
pub use tui_2048_types as types;
