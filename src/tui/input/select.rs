use crossterm::event::{KeyCode, KeyEvent};

use crate::api::Api;
use crate::tui::app::{App, Mode};
use crate::tui::mutation;
use crate::tui::projection::Slot;

use super::{handle_movement, move_mode, navigate};

/// Enter SELECT mode and toggle the task under the cursor.
pub(super) fn enter_select_mode<A: Api>(app: &mut App<A>) {
    let Some(task) = app.cursor.resolve_current(&app.projection, app.store.view()) else {
        return;
    };
    let id = task.id.clone();
    app.cursor.toggle_selection(&id);
    app.mode = Mode::Select;
}

/// Handle keys in SELECT mode.
pub(super) fn handle_select<A: Api>(app: &mut App<A>, key: KeyEvent) {
    // Pending delete confirmation works the same as in navigate mode
    if app.pending_delete {
        app.pending_delete = false;
        if matches!(key.code, KeyCode::Char('d')) {
            mutation::delete(app);
            app.mode = Mode::Navigate;
        } else {
            app.set_status("Delete cancelled");
        }
        return;
    }

    app.status_message = None;
    app.status_is_error = false;

    if handle_movement(app, key) {
        return;
    }

    match key.code {
        // Toggle the task under the cursor
        KeyCode::Char(' ') | KeyCode::Char('v') | KeyCode::Char('x') => {
            if let Some(task) = app.cursor.resolve_current(&app.projection, app.store.view()) {
                let id = task.id.clone();
                app.cursor.toggle_selection(&id);
            }
            if app.cursor.selected.is_empty() {
                app.mode = Mode::Navigate;
            }
        }

        // Select every task slot in the sequence
        KeyCode::Char('a') => {
            let ids: Vec<String> = app
                .projection
                .slots
                .iter()
                .filter_map(|s| match s {
                    Slot::Task { view_idx } => {
                        app.store.view_task(*view_idx).map(|t| t.id.clone())
                    }
                    _ => None,
                })
                .collect();
            for id in ids {
                app.cursor.selected.insert(id);
            }
        }

        // Batch commands; the selection clears on optimistic apply, so
        // select mode ends with them
        KeyCode::Char('c') => {
            mutation::complete(app);
            app.mode = Mode::Navigate;
        }
        KeyCode::Char('d') => navigate::arm_delete(app),
        KeyCode::Char('m') => move_mode::open_move_picker(app),

        KeyCode::Esc => {
            app.cursor.clear_selection();
            app.mode = Mode::Navigate;
        }

        _ => {}
    }
}
