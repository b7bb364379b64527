use crossterm::event::{KeyCode, KeyEvent};

use crate::api::Api;
use crate::tui::app::{App, Mode, MovePicker};
use crate::tui::mutation;

/// Open the move-target picker for the selection or the cursor task.
pub(super) fn open_move_picker<A: Api>(app: &mut App<A>) {
    let has_target = !app.cursor.selected.is_empty()
        || app
            .cursor
            .resolve_current(&app.projection, app.store.view())
            .is_some();
    if !has_target {
        return;
    }
    let choices = app.build_move_choices();
    if choices.is_empty() {
        return;
    }
    app.move_picker = Some(MovePicker { choices, cursor: 0 });
    app.mode = Mode::MovePick;
}

/// Handle keys in the move-target picker.
pub(super) fn handle_move_pick<A: Api>(app: &mut App<A>, key: KeyEvent) {
    let Some(picker) = app.move_picker.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if picker.cursor + 1 < picker.choices.len() {
                picker.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            picker.cursor = picker.cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            let target = picker.choices.get(picker.cursor).map(|c| c.target.clone());
            app.move_picker = None;
            app.mode = Mode::Navigate;
            if let Some(target) = target {
                mutation::move_to(app, target);
            }
        }
        KeyCode::Esc => {
            app.move_picker = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}
