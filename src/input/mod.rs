//! Key mapping from terminal events to session commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::GameAction;

/// A decoded keyboard command: either a gameplay action for the keyboard
/// board, or a session control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Game(GameAction),
    TogglePause,
    Restart,
}

/// Map keyboard input to commands.
pub fn map_key(key: KeyEvent) -> Option<InputCommand> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(InputCommand::Game(GameAction::MoveLeft))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(InputCommand::Game(GameAction::MoveRight))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(InputCommand::Game(GameAction::SoftDrop))
        }

        // Rotation
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some(InputCommand::Game(GameAction::Rotate))
        }

        // Drop
        KeyCode::Char(' ') => Some(InputCommand::Game(GameAction::HardDrop)),

        // Session control
        KeyCode::Char('p') | KeyCode::Char('P') => Some(InputCommand::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputCommand::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
