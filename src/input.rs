//! Key bindings: terminal key presses to session commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::language::{Language, LEVELS};
use crate::session::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Command(Command),
    Quit,
    Ignore,
}

/// Level the level toggle moves to from `level`
pub fn next_level(level: u32) -> u32 {
    LEVELS
        .iter()
        .position(|&l| l == level)
        .map(|i| LEVELS[(i + 1) % LEVELS.len()])
        .unwrap_or(LEVELS[0])
}

/// Translate a key press given the current raw buffer and the latest selection.
pub fn translate_key(key: &KeyEvent, raw: &str, selection: (Language, u32)) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    let (language, level) = selection;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('l') if ctrl => KeyAction::Command(Command::SelectLevel(next_level(level))),
        KeyCode::Char(_) if ctrl => KeyAction::Ignore,
        KeyCode::Char(' ') => KeyAction::Command(Command::Skip),
        KeyCode::Char(c) => {
            let mut buffer = raw.to_string();
            buffer.push(c);
            KeyAction::Command(Command::InputChanged(buffer))
        }
        KeyCode::Backspace if raw.is_empty() => KeyAction::Command(Command::BackspaceAtEmpty),
        KeyCode::Backspace => {
            let mut buffer = raw.to_string();
            buffer.pop();
            KeyAction::Command(Command::InputChanged(buffer))
        }
        KeyCode::Esc => KeyAction::Command(Command::Restart),
        KeyCode::Enter => KeyAction::Command(Command::Finish),
        KeyCode::Tab => KeyAction::Command(Command::SelectLanguage(language.next())),
        _ => KeyAction::Ignore,
    }
}
