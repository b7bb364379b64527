mod move_mode;
mod navigate;
mod select;

use crossterm::event::{KeyCode, KeyEvent};

use crate::api::Api;

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key<A: Api>(app: &mut App<A>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay intercepts everything
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key),
        Mode::Select => select::handle_select(app, key),
        Mode::MovePick => move_mode::handle_move_pick(app, key),
    }
}

/// Cursor movement shared by navigate and select modes.
pub(super) fn handle_movement<A: Api>(app: &mut App<A>, key: KeyEvent) -> bool {
    let half_page = (app.list_height / 2).max(1) as isize;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.cursor.move_by(&app.projection, 1),
        KeyCode::Char('k') | KeyCode::Up => app.cursor.move_by(&app.projection, -1),
        KeyCode::PageDown => app.cursor.move_by(&app.projection, half_page),
        KeyCode::PageUp => app.cursor.move_by(&app.projection, -half_page),
        KeyCode::Char('g') | KeyCode::Home => app.cursor.jump_to_start(&app.projection),
        KeyCode::Char('G') | KeyCode::End => app.cursor.jump_to_end(&app.projection),
        _ => return false,
    }
    true
}
