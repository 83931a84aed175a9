//! Key mapping from terminal events to raw input codes.
//!
//! The engine owns the code-to-heading mapping; this module only names keys
//! the way the engine expects them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a keyboard event to a raw input code.
///
/// Keys with no code return `None`. Codes the engine does not recognise are
/// still passed through and ignored there.
pub fn key_code(key: KeyEvent) -> Option<&'static str> {
    match key.code {
        KeyCode::Left => Some("ArrowLeft"),
        KeyCode::Right => Some("ArrowRight"),
        KeyCode::Up => Some("ArrowUp"),
        KeyCode::Down => Some("ArrowDown"),

        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some("KeyA")
        }
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some("KeyD")
        }
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some("KeyW")
        }
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some("KeyS")
        }

        KeyCode::Char(' ') => Some("Space"),
        KeyCode::Enter => Some("Enter"),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
