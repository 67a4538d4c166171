//! Keyboard input handling for the TUI.
//!
//! Translates key events into directory actions and UI mode changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    if matches!(app.state, AppState::Searching) {
        return handle_search_input(app, key);
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('r') => app.start_fetch(),
        KeyCode::Char('t') => app.retry(),
        KeyCode::Char('c') => app.clear(),
        KeyCode::Char('/') => app.state = AppState::Searching,
        KeyCode::Char('s') => app.cycle_sort(true),
        KeyCode::Char('S') => app.cycle_sort(false),
        KeyCode::Esc => {
            if !app.directory.state().query().is_empty() {
                app.clear_search();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        _ => {}
    }
    false
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.clear_search();
        }
        KeyCode::Enter => {
            // Keep the query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
    false
}
