use std::io;
use std::path::PathBuf;

use tui_2048_types::MAX_GRID_SIZE;

/// Failure while reading or writing the data directory
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("cannot access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },
    #[display("grid size must be at least 2, got {_0}")]
    GridTooSmall(#[error(not(source))] usize),
    #[display("grid size must be at most {}, got {_0}", MAX_GRID_SIZE)]
    GridTooLarge(#[error(not(source))] usize),
    #[display("no data directory: set TUI2048_HOME or HOME")]
    NoDataDir,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
