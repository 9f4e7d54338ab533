//! Operator keyboard input.
//!
//! Reads crossterm key events without blocking and turns them into manual
//! commands through the shared key map. `q`, Esc and Ctrl+C request
//! shutdown instead of producing a command.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use standfirst::control::{CommandFeed, ManualCommand};
use standfirst::keymap;

/// What a key press means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Command(ManualCommand),
    Quit,
    Ignore,
}

/// Interpret one key event.
pub fn action_for_key(key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Enter => command_or_ignore('\n'),
        KeyCode::Char(c) => command_or_ignore(c),
        _ => KeyAction::Ignore,
    }
}

fn command_or_ignore(c: char) -> KeyAction {
    match keymap::command_for_char(c) {
        Some(command) => KeyAction::Command(command),
        None => {
            tracing::debug!(key = ?c, "Key not mapped");
            KeyAction::Ignore
        }
    }
}

/// Command feed backed by the terminal.
///
/// Requires raw mode, which the board enables.
pub struct KeyboardFeed {
    shutdown: Arc<AtomicBool>,
}

impl KeyboardFeed {
    pub fn new(shutdown: Arc<AtomicBool>) -> Self {
        Self { shutdown }
    }
}

impl CommandFeed for KeyboardFeed {
    fn poll_command(&mut self) -> Option<ManualCommand> {
        while let Ok(true) = event::poll(Duration::ZERO) {
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            match action_for_key(key) {
                KeyAction::Command(command) => return Some(command),
                KeyAction::Quit => {
                    tracing::info!("Quit requested from keyboard");
                    self.shutdown.store(true, Ordering::SeqCst);
                    return None;
                }
                KeyAction::Ignore => {}
            }
        }
        None
    }
}
