//! Hidden password entry on the terminal.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::io::Write;

/// Leaves raw mode when dropped, whatever way the prompt ends.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// What a key press does to the password being typed.
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Push(char),
    Pop,
    Submit,
    Abort,
    Ignore,
}

fn key_action(key: &KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    match key.code {
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Abort
        }
        KeyCode::Char(c) => KeyAction::Push(c),
        KeyCode::Backspace => KeyAction::Pop,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Esc => KeyAction::Abort,
        _ => KeyAction::Ignore,
    }
}

/// Prints `prompt` to stderr and reads a line without echoing it.
///
/// Returns `None` when the user gives up with Ctrl-C, Ctrl-D or Escape.
pub fn read_password(prompt: &str) -> anyhow::Result<Option<String>> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;

    let mut password = String::new();
    let outcome = {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                match key_action(&key) {
                    KeyAction::Push(c) => password.push(c),
                    KeyAction::Pop => {
                        password.pop();
                    }
                    KeyAction::Submit => break Some(password),
                    KeyAction::Abort => break None,
                    KeyAction::Ignore => {}
                }
            }
        }
    };

    writeln!(stderr)?;
    Ok(outcome)
}
