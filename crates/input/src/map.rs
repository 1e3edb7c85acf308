//! Key mapping from terminal events to game actions.

use crate::types::{Direction, GameAction, SettingsAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let action = match key.code {
        // Movement
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k' | 'K') => GameAction::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J') => GameAction::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => GameAction::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => {
            GameAction::Move(Direction::Right)
        }

        KeyCode::Char(' ' | 'p' | 'P') => GameAction::Pause,
        KeyCode::Char('r' | 'R') => GameAction::Restart,

        _ => return None,
    };
    Some(action)
}

/// Map keyboard input to sound preference changes.
pub fn settings_action(key: KeyEvent) -> Option<SettingsAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('m' | 'M') => Some(SettingsAction::ToggleSound),
        KeyCode::Char('+' | '=') => Some(SettingsAction::VolumeUp),
        KeyCode::Char('-' | '_') => Some(SettingsAction::VolumeDown),
        _ => None,
    }
}

/// Check if key toggles the history screen.
pub fn is_history_key(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('?' | 'y' | 'Y'))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q' | 'Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
