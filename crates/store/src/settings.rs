//! Player settings - `settings.json` plus environment overrides
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `TUI2048_SOUND` | `sound_enabled` | `1`/`0`, `true`/`false`, `on`/`off` |
//! | `TUI2048_VOLUME` | `sound_volume` | float, clamped to `[0, 1]` |
//! | `TUI2048_GRID_SIZE` | `grid_size` | integer in `2..=MAX_GRID_SIZE` |
//! | `TUI2048_SEED` | `seed` | u64 |
//!
//! The data directory is `TUI2048_HOME`, else `$HOME/.tui-2048`. Without one, or
//! with an unreadable `settings.json`, the defaults are used.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tui_2048_types::{SettingsAction, GRID_SIZE, MAX_GRID_SIZE};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sound_enabled: bool,
    pub sound_volume: f32,
    pub grid_size: usize,
    /// Fixed RNG seed; a time-based seed is used when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            sound_volume: 1.0,
            grid_size: GRID_SIZE,
            seed: None,
        }
    }
}

impl Settings {
    pub const FILE_NAME: &'static str = "settings.json";

    /// Volume change per key press
    pub const VOLUME_STEP: f32 = 0.1;

    /// Data directory settings, then environment overrides
    ///
    /// Only a malformed `TUI2048_*` value is an error.
    pub fn from_env() -> Result<Self, StoreError> {
        let dir = match data_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                warn!("{e}; using default settings");
                None
            }
        };
        Self::resolve(dir.as_deref(), |key| env::var(key).ok())
    }

    /// Settings from `dir` (defaults when `None` or unreadable) with overrides
    /// looked up through `get`
    pub fn resolve<F>(dir: Option<&Path>, get: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match dir.map(Self::load) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                warn!("settings unavailable: {e}; using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        settings.apply_env(get)?;
        Ok(settings)
    }

    /// Read `settings.json` from `dir`; a missing file yields the defaults
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let path = dir.join(Self::FILE_NAME);
        let mut settings: Settings = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| StoreError::json(&path, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no settings at {}, using defaults", path.display());
                Settings::default()
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        let path = dir.join(Self::FILE_NAME);
        let json = serde_json::to_string_pretty(self).map_err(|e| StoreError::json(&path, e))?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;
        info!("saved settings to {}", path.display());
        Ok(())
    }

    /// Write the sound preferences of `self` into the file in `dir`
    ///
    /// Other stored fields are kept as they are on disk, so environment
    /// overrides of grid size or seed never reach the file.
    pub fn save_sound(&self, dir: &Path) -> Result<(), StoreError> {
        let mut stored = Self::load(dir).unwrap_or_else(|e| {
            warn!("replacing unreadable settings: {e}");
            Self::default()
        });
        stored.sound_enabled = self.sound_enabled;
        stored.sound_volume = self.sound_volume;
        stored.save(dir)
    }

    /// Apply a front-end preference change
    pub fn apply(&mut self, action: SettingsAction) {
        match action {
            SettingsAction::ToggleSound => self.sound_enabled = !self.sound_enabled,
            SettingsAction::VolumeUp => self.step_volume(Self::VOLUME_STEP),
            SettingsAction::VolumeDown => self.step_volume(-Self::VOLUME_STEP),
        }
        debug!(
            "sound {}, volume {}%",
            if self.sound_enabled { "on" } else { "off" },
            self.volume_pct()
        );
    }

    fn step_volume(&mut self, delta: f32) {
        let steps = ((self.sound_volume + delta) / Self::VOLUME_STEP).round();
        self.sound_volume = (steps * Self::VOLUME_STEP).clamp(0.0, 1.0);
    }

    /// Volume as a whole percentage
    pub fn volume_pct(&self) -> u8 {
        (self.sound_volume.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// Apply `TUI2048_*` overrides looked up through `get`
    ///
    /// Blank values are ignored.
    pub fn apply_env<F>(&mut self, get: F) -> Result<(), StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            get(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(value) = lookup("TUI2048_SOUND") {
            self.sound_enabled = parse_flag(&value).ok_or(StoreError::InvalidSetting {
                key: "TUI2048_SOUND",
                value,
            })?;
        }
        if let Some(value) = lookup("TUI2048_VOLUME") {
            self.sound_volume = value.parse().map_err(|_| StoreError::InvalidSetting {
                key: "TUI2048_VOLUME",
                value,
            })?;
        }
        if let Some(value) = lookup("TUI2048_GRID_SIZE") {
            self.grid_size = value.parse().map_err(|_| StoreError::InvalidSetting {
                key: "TUI2048_GRID_SIZE",
                value,
            })?;
        }
        if let Some(value) = lookup("TUI2048_SEED") {
            let seed = value.parse().map_err(|_| StoreError::InvalidSetting {
                key: "TUI2048_SEED",
                value,
            })?;
            self.seed = Some(seed);
        }

        self.validate()
    }

    /// Clamp the volume and reject unusable grid sizes
    pub fn validate(&mut self) -> Result<(), StoreError> {
        if self.grid_size < 2 {
            return Err(StoreError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(StoreError::GridTooLarge(self.grid_size));
        }
        self.sound_volume = if self.sound_volume.is_nan() {
            0.0
        } else {
            self.sound_volume.clamp(0.0, 1.0)
        };
        Ok(())
    }

    /// Whether sound cues should be played at all
    pub fn sound_audible(&self) -> bool {
        self.sound_enabled && self.sound_volume > 0.0
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Directory holding `settings.json` and `history.json`
pub fn data_dir() -> Result<PathBuf, StoreError> {
    if let Some(home) = env::var_os("TUI2048_HOME").filter(|s| !s.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    env::var_os("HOME")
        .filter(|s| !s.is_empty())
        .map(|home| PathBuf::from(home).join(".tui-2048"))
        .ok_or(StoreError::NoDataDir)
}
