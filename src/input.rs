//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions. Screen-specific keys (date
//! navigation, explanation toggle) are accepted everywhere; the [`App`]
//! methods ignore them off the APOD screen.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, Tab};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.previous_tab(),
        KeyCode::Char('1') => app.select_tab(Tab::Earth),
        KeyCode::Char('2') => app.select_tab(Tab::Apod),
        KeyCode::Char('3') => app.select_tab(Tab::Mars),
        KeyCode::Left | KeyCode::Char('h') => app.previous_day(),
        KeyCode::Right | KeyCode::Char('l') => app.next_day(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_explanation(),
        _ => {}
    }
}
