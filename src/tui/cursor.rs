use std::collections::HashSet;

use crate::model::Task;

use super::projection::Projection;

/// Cursor position, scroll offset, and the multi-selection set.
///
/// The cursor indexes the ordered display sequence and is re-clamped onto a
/// task slot after every reprojection; the selection is a set of task ids
/// independent of both the cursor and the sequence shape.
#[derive(Debug, Clone, Default)]
pub struct CursorState {
    pub cursor: usize,
    pub scroll: usize,
    pub selected: HashSet<String>,
}

impl CursorState {
    /// Advance the cursor by `delta` slots, clamping to bounds and skipping
    /// placeholder runs in the direction of travel. When a boundary run
    /// cannot be escaped forward, the nearest task slot behind is used; with
    /// no task slot anywhere the cursor rests at 0.
    pub fn move_by(&mut self, proj: &Projection, delta: isize) {
        if proj.is_empty() {
            self.cursor = 0;
            return;
        }
        let max = proj.len() as isize - 1;
        let target = (self.cursor as isize + delta).clamp(0, max) as usize;
        self.cursor = settle(proj, target, delta >= 0);
    }

    /// Jump to the first task slot, skipping leading placeholders.
    pub fn jump_to_start(&mut self, proj: &Projection) {
        self.cursor = proj.first_task_slot().unwrap_or(0);
    }

    /// Jump to the last task slot, skipping trailing placeholders.
    pub fn jump_to_end(&mut self, proj: &Projection) {
        self.cursor = proj.last_task_slot().unwrap_or(0);
    }

    /// The task under the cursor, if the cursor is on a task slot. Gates
    /// every entity-scoped command.
    pub fn resolve_current<'a>(&self, proj: &Projection, view: &'a [Task]) -> Option<&'a Task> {
        proj.task_at(self.cursor).and_then(|k| view.get(k))
    }

    pub fn toggle_selection(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Reprojection hook: re-resolve the previously focused task id to its
    /// new slot ("sticky cursor"), falling back to the clamped index when
    /// the entity is gone.
    pub fn restore(&mut self, proj: &Projection, view: &[Task], prev_id: Option<&str>) {
        if let Some(id) = prev_id
            && let Some(k) = view.iter().position(|t| t.id == id)
            && let Some(pos) = proj.slot_of_view_idx(k)
        {
            self.cursor = pos;
            return;
        }
        self.move_by(proj, 0);
    }
}

/// Resolve `target` to a task slot: scan in the travel direction first,
/// then the other way. 0 when the sequence has no task slot at all.
fn settle(proj: &Projection, target: usize, forward: bool) -> usize {
    if proj.task_at(target).is_some() {
        return target;
    }
    let ahead = (target + 1..proj.len()).find(|&i| proj.task_at(i).is_some());
    let behind = (0..target).rev().find(|&i| proj.task_at(i).is_some());
    let (first, second) = if forward { (ahead, behind) } else { (behind, ahead) };
    first.or(second).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::projection::Slot;

    fn proj(slots: Vec<Slot>) -> Projection {
        Projection { slots }
    }

    fn header() -> Slot {
        Slot::Header {
            title: "H".into(),
            section_id: None,
        }
    }

    fn task(view_idx: usize) -> Slot {
        Slot::Task { view_idx }
    }

    #[test]
    fn test_move_by_skips_headers_downward() {
        // [task, header, task]
        let p = proj(vec![task(0), header(), task(1)]);
        let mut c = CursorState::default();
        c.move_by(&p, 1);
        assert_eq!(c.cursor, 2);
    }

    #[test]
    fn test_move_by_skips_headers_upward() {
        let p = proj(vec![task(0), header(), task(1)]);
        let mut c = CursorState {
            cursor: 2,
            ..Default::default()
        };
        c.move_by(&p, -1);
        assert_eq!(c.cursor, 0);
    }

    #[test]
    fn test_move_by_clamps_at_bounds() {
        let p = proj(vec![task(0), task(1)]);
        let mut c = CursorState::default();
        c.move_by(&p, -5);
        assert_eq!(c.cursor, 0);
        c.move_by(&p, 99);
        assert_eq!(c.cursor, 1);
    }

    #[test]
    fn test_move_by_escapes_trailing_placeholder_backward() {
        // Landing past the last task slot must fall back to it.
        let p = proj(vec![task(0), header()]);
        let mut c = CursorState::default();
        c.move_by(&p, 1);
        assert_eq!(c.cursor, 0);
    }

    #[test]
    fn test_zero_delta_is_idempotent() {
        let p = proj(vec![header(), task(0), task(1)]);
        let mut c = CursorState::default();
        c.move_by(&p, 0);
        let first = c.cursor;
        c.move_by(&p, 0);
        c.move_by(&p, 0);
        assert_eq!(c.cursor, first);
        assert_eq!(c.cursor, 1);
    }

    #[test]
    fn test_rests_at_zero_with_no_task_slots() {
        let p = proj(vec![header(), Slot::Blank, header()]);
        let mut c = CursorState {
            cursor: 2,
            ..Default::default()
        };
        c.move_by(&p, 0);
        assert_eq!(c.cursor, 0);
        c.move_by(&p, 1);
        assert_eq!(c.cursor, 0);
    }

    #[test]
    fn test_jump_to_start_and_end_skip_placeholders() {
        let p = proj(vec![header(), task(0), task(1), Slot::Blank]);
        let mut c = CursorState::default();
        c.jump_to_end(&p);
        assert_eq!(c.cursor, 2);
        c.jump_to_start(&p);
        assert_eq!(c.cursor, 1);
    }

    #[test]
    fn test_resolve_current_none_on_placeholder() {
        let view = vec![Task::new("a", "a", "p")];
        let p = proj(vec![header(), task(0)]);
        let c = CursorState::default();
        assert!(c.resolve_current(&p, &view).is_none());
        let c = CursorState {
            cursor: 1,
            ..Default::default()
        };
        assert_eq!(c.resolve_current(&p, &view).map(|t| t.id.as_str()), Some("a"));
    }

    #[test]
    fn test_restore_is_sticky_across_regrouping() {
        let view = vec![Task::new("a", "a", "p"), Task::new("b", "b", "p")];
        // "b" moved from slot 2 to slot 1 after regrouping.
        let p = proj(vec![task(1), header(), task(0)]);
        let mut c = CursorState {
            cursor: 5,
            ..Default::default()
        };
        c.restore(&p, &view, Some("b"));
        assert_eq!(c.cursor, 0);
    }

    #[test]
    fn test_restore_falls_back_to_clamped_index() {
        let view = vec![Task::new("a", "a", "p")];
        let p = proj(vec![header(), task(0)]);
        let mut c = CursorState {
            cursor: 7,
            ..Default::default()
        };
        c.restore(&p, &view, Some("gone"));
        assert_eq!(c.cursor, 1);
    }

    #[test]
    fn test_selection_survives_and_toggles() {
        let mut c = CursorState::default();
        c.toggle_selection("a");
        c.toggle_selection("b");
        c.toggle_selection("a");
        assert!(!c.selected.contains("a"));
        assert!(c.selected.contains("b"));
        c.clear_selection();
        assert!(c.selected.is_empty());
    }
}
