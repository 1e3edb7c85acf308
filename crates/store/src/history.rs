//! Game history - finished games persisted newest first

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tui_2048_types::GameSummary;

use crate::error::StoreError;

/// JSON-file backed list of finished games
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub const FILE_NAME: &'static str = "history.json";

    /// Store backed by the file at `path`; nothing is read until [`load`](Self::load)
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `history.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::open(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded games, newest first; a missing file is an empty history
    pub fn load(&self) -> Result<Vec<GameSummary>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        serde_json::from_str(&text).map_err(|e| StoreError::json(&self.path, e))
    }

    /// Record a finished game at the front of the list
    ///
    /// Returns the updated history.
    pub fn append(&self, summary: GameSummary) -> Result<Vec<GameSummary>, StoreError> {
        let mut entries = self.load()?;
        entries.insert(0, summary);
        self.write(&entries)?;
        info!(
            "recorded game: score {}, max tile {} ({} games)",
            summary.score,
            summary.max_tile_value,
            entries.len()
        );
        Ok(entries)
    }

    /// Forget every recorded game
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    fn write(&self, entries: &[GameSummary]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let json =
            serde_json::to_string_pretty(entries).map_err(|e| StoreError::json(&self.path, e))?;

        // Replaced atomically via rename.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            warn!("rename {} failed: {e}", tmp.display());
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&self.path, e));
        }
        Ok(())
    }
}

/// Aggregates shown on the history screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub best_score: u32,
    pub best_tile: u32,
    pub games_played: usize,
}

impl HistoryStats {
    pub fn from_entries(entries: &[GameSummary]) -> Self {
        Self {
            best_score: entries.iter().map(|e| e.score).max().unwrap_or(0),
            best_tile: entries.iter().map(|e| e.max_tile_value).max().unwrap_or(0),
            games_played: entries.len(),
        }
    }
}

/// Format a duration as `HH:MM:SS.mmm`
///
/// # Examples
///
/// ```
/// use tui_2048_store::format_elapsed;
///
/// assert_eq!(format_elapsed(0), "00:00:00.000");
/// assert_eq!(format_elapsed(3_723_004), "01:02:03.004");
/// ```
pub fn format_elapsed(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1_000) % 60;
    let millis = ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}
