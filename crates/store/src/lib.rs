//! Persistence for the terminal front end
//!
//! Two small JSON files live in the data directory:
//!
//! - `history.json`: finished games, newest first ([`HistoryStore`])
//! - `settings.json`: sound and board preferences ([`Settings`])
//!
//! The core never touches the filesystem; the front end hands each
//! [`GameSummary`](tui_2048_types::GameSummary) taken from the session to the
//! history store.

pub mod error;
pub mod history;
pub mod settings;

pub use tui_2048_types as types;

pub use error::StoreError;
pub use history::{format_elapsed, HistoryStats, HistoryStore};
pub use settings::{data_dir, Settings};
