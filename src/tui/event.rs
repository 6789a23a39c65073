use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

/// Result of handling a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    /// Re-run the current query against the in-memory store.
    Refresh,
    /// Re-read the store from disk, then refresh.
    Reload,
    CycleStatus,
    Continue,
}

/// Handle a key press. Returns an action indicating what the event loop should do.
pub fn handle_key(app: &mut App, key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    match app.mode {
        Mode::Search => handle_search(app, key),
        Mode::Help => {
            app.toggle_help();
            KeyAction::Continue
        }
        Mode::Normal => handle_normal(app, key),
    }
}

fn handle_normal(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
            KeyAction::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            KeyAction::Continue
        }
        KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
            if app.next_page() {
                KeyAction::Refresh
            } else {
                KeyAction::Continue
            }
        }
        KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => {
            if app.prev_page() {
                KeyAction::Refresh
            } else {
                KeyAction::Continue
            }
        }
        KeyCode::Char('/') => {
            app.start_search();
            KeyAction::Continue
        }
        KeyCode::Char('s') => KeyAction::CycleStatus,
        KeyCode::Char('r') => KeyAction::Reload,
        KeyCode::Enter => {
            app.toggle_detail();
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            app.toggle_help();
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

fn handle_search(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            app.cancel_search();
            KeyAction::Continue
        }
        KeyCode::Enter => {
            app.apply_search();
            KeyAction::Refresh
        }
        KeyCode::Backspace => {
            app.input.pop();
            KeyAction::Continue
        }
        KeyCode::Char(c) => {
            app.input.push(c);
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}
