//! Key bindings
//!
//! | Key            | Intent          |
//! |----------------|-----------------|
//! | Tab            | switch timer    |
//! | s / p          | start / pause   |
//! | Space          | start or pause  |
//! | r              | reset           |
//! | Esc            | reset (confirm) |
//! | Enter          | save stopwatch  |
//! | j / k, arrows  | select record   |
//! | d              | delete record   |
//! | l / w          | load / write    |
//! | q, Ctrl+c      | quit            |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Intent;

/// Map a key press on the main screen to an intent
pub fn intent_for_key(key: KeyEvent) -> Option<Intent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }

    let intent = match key.code {
        KeyCode::Tab => Intent::SwitchTimer,
        KeyCode::Char('s') => Intent::Start,
        KeyCode::Char('p') => Intent::Pause,
        KeyCode::Char(' ') => Intent::ToggleRun,
        KeyCode::Char('r') => Intent::Reset,
        KeyCode::Esc => Intent::RequestReset,
        KeyCode::Enter => Intent::Save,
        KeyCode::Char('j') | KeyCode::Down => Intent::SelectNext,
        KeyCode::Char('k') | KeyCode::Up => Intent::SelectPrev,
        KeyCode::Char('d') => Intent::Delete,
        KeyCode::Char('l') => Intent::LoadHistory,
        KeyCode::Char('w') => Intent::SaveHistory,
        KeyCode::Char('q') => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}
