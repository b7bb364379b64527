use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::Api;
use crate::tui::app::App;
use crate::tui::mutation;

use super::{handle_movement, move_mode, select};

pub(super) fn handle_navigate<A: Api>(app: &mut App<A>, key: KeyEvent) {
    // Pending delete: second 'd' confirms, any other key disarms
    if app.pending_delete {
        app.pending_delete = false;
        if matches!(key.code, KeyCode::Char('d')) {
            mutation::delete(app);
        } else {
            app.set_status("Delete cancelled");
        }
        return;
    }

    // Clear any transient status message on keypress
    app.status_message = None;
    app.status_is_error = false;

    if handle_movement(app, key) {
        return;
    }

    match (key.modifiers, key.code) {
        // Quit: q or Ctrl+C
        (_, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Tab switching
        (_, KeyCode::Tab) => app.next_tab(),
        (_, KeyCode::BackTab) => app.prev_tab(),

        // Cycle grouping mode
        (_, KeyCode::Char('s')) => app.cycle_grouping(),

        // Enter select mode on the task under the cursor
        (_, KeyCode::Char('v')) => select::enter_select_mode(app),

        // Task commands
        (_, KeyCode::Char('c')) => mutation::complete(app),
        (_, KeyCode::Char('d')) => arm_delete(app),
        (_, KeyCode::Char('m')) => move_mode::open_move_picker(app),
        (_, KeyCode::Char('p')) => mutation::cycle_priority(app),
        (_, KeyCode::Char('u')) => mutation::undo(app),

        // Manual resync
        (_, KeyCode::Char('r')) => {
            app.set_status("Syncing…");
            app.start_sync();
        }

        (_, KeyCode::Char('?')) => app.show_help = true,

        // Esc clears the selection (if any survived a cancelled flow)
        (_, KeyCode::Esc) => app.cursor.clear_selection(),

        _ => {}
    }
}

/// Arm delete confirmation, but only when a target would resolve.
pub(super) fn arm_delete<A: Api>(app: &mut App<A>) {
    let count = if app.cursor.selected.is_empty() {
        usize::from(
            app.cursor
                .resolve_current(&app.projection, app.store.view())
                .is_some(),
        )
    } else {
        app.cursor.selected.len()
    };
    if count == 0 {
        return;
    }
    app.pending_delete = true;
    let noun = if count == 1 { "task" } else { "tasks" };
    app.set_status(format!("Delete {count} {noun}? press d again to confirm"));
}
