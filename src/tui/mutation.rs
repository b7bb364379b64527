use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{Semaphore, mpsc};

use crate::api::{Api, MoveTarget, TaskPatch};

use super::app::{App, AppEvent};

/// Batch command kind, carried through dispatch and into the settled
/// outcome for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Complete,
    Uncomplete,
    Delete,
    Move,
    Update,
}

impl BatchKind {
    fn verb(self) -> &'static str {
        match self {
            BatchKind::Complete => "Completed",
            BatchKind::Uncomplete => "Reopened",
            BatchKind::Delete => "Deleted",
            BatchKind::Move => "Moved",
            BatchKind::Update => "Updated",
        }
    }
}

/// Aggregated result of one dispatched batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub kind: BatchKind,
    pub ok: usize,
    pub failed: usize,
    /// Set when the batch was issued by `undo`; settles into a resync even
    /// on success so the reverted task reappears in the projection.
    pub is_undo: bool,
}

impl BatchOutcome {
    pub fn message(&self) -> String {
        if self.is_undo {
            if self.failed == 0 {
                "Undid last action".to_string()
            } else {
                "Undo failed".to_string()
            }
        } else {
            let total = self.ok + self.failed;
            let noun = if total == 1 { "task" } else { "tasks" };
            if self.failed == 0 {
                format!("{} {} {}", self.kind.verb(), self.ok, noun)
            } else {
                format!("{} {} {}, {} failed", self.kind.verb(), self.ok, noun, self.failed)
            }
        }
    }
}

/// Most recent reversible action. Only single-task complete/uncomplete is
/// recorded; a new record overwrites the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    pub id: String,
    /// True when the inverse call is reopen (the action was a completion).
    pub reopen: bool,
}

/// Resolve the operand set: the selection when non-empty, else the task
/// under the cursor. Empty resolution means the command silently aborts.
fn targets<A: Api>(app: &App<A>) -> Vec<String> {
    if !app.cursor.selected.is_empty() {
        return app.cursor.selected.iter().cloned().collect();
    }
    app.cursor
        .resolve_current(&app.projection, app.store.view())
        .map(|t| vec![t.id.clone()])
        .unwrap_or_default()
}

/// Complete the selection or the task under the cursor: optimistic removal
/// from the store, then per-operand close calls.
pub fn complete<A: Api>(app: &mut App<A>) {
    let ids = targets(app);
    if ids.is_empty() {
        return;
    }
    if let [id] = ids.as_slice() {
        app.undo = Some(UndoRecord {
            id: id.clone(),
            reopen: true,
        });
    }
    app.store.remove_by_id(&ids);
    after_optimistic_apply(app);
    dispatch_each(app, BatchKind::Complete, ids);
}

/// Reopen previously completed tasks: optimistic uncheck, then per-operand
/// reopen calls. No-op unless an operand resolves.
pub fn uncomplete<A: Api>(app: &mut App<A>) {
    let ids = targets(app);
    if ids.is_empty() {
        return;
    }
    if let [id] = ids.as_slice() {
        app.undo = Some(UndoRecord {
            id: id.clone(),
            reopen: false,
        });
    }
    for id in &ids {
        app.store.mutate_by_id(id, |t| t.checked = false);
    }
    after_optimistic_apply(app);
    dispatch_each(app, BatchKind::Uncomplete, ids);
}

/// Delete the selection or the task under the cursor. Not undoable.
pub fn delete<A: Api>(app: &mut App<A>) {
    let ids = targets(app);
    if ids.is_empty() {
        return;
    }
    app.store.remove_by_id(&ids);
    after_optimistic_apply(app);
    dispatch_each(app, BatchKind::Delete, ids);
}

/// Move the selection or the cursor task to another project/section. One
/// batch-move remote call covers all operands.
pub fn move_to<A: Api>(app: &mut App<A>, target: MoveTarget) {
    let ids = targets(app);
    if ids.is_empty() {
        return;
    }
    for id in &ids {
        let target = target.clone();
        app.store.mutate_by_id(id, move |t| {
            t.project_id = target.project_id.clone();
            t.section_id = target.section_id.clone();
        });
    }
    // A move can take the task out of the current filter entirely.
    app.refilter();
    app.cursor.clear_selection();
    app.undo = None;

    let api = app.api.clone();
    let tx = app.events_tx.clone();
    let count = ids.len();
    app.handle.spawn(async move {
        let outcome = match api.batch_move_tasks(&ids, target).await {
            Ok(()) => BatchOutcome {
                kind: BatchKind::Move,
                ok: count,
                failed: 0,
                is_undo: false,
            },
            Err(e) => {
                warn!("batch move of {count} tasks failed: {e}");
                BatchOutcome {
                    kind: BatchKind::Move,
                    ok: 0,
                    failed: count,
                    is_undo: false,
                }
            }
        };
        let _ = tx.send(AppEvent::BatchSettled(outcome));
    });
}

/// Cycle the priority of the task under the cursor: optimistic field edit
/// plus a single update call.
pub fn cycle_priority<A: Api>(app: &mut App<A>) {
    let Some(task) = app.cursor.resolve_current(&app.projection, app.store.view()) else {
        return;
    };
    let id = task.id.clone();
    let next = task.priority.cycled();
    app.store.mutate_by_id(&id, |t| t.priority = next);
    after_optimistic_apply(app);

    let api = app.api.clone();
    let tx = app.events_tx.clone();
    app.handle.spawn(async move {
        let patch = TaskPatch {
            priority: Some(next),
            ..TaskPatch::default()
        };
        let outcome = match api.update_task(&id, patch).await {
            Ok(()) => BatchOutcome {
                kind: BatchKind::Update,
                ok: 1,
                failed: 0,
                is_undo: false,
            },
            Err(e) => {
                warn!("priority update for {id} failed: {e}");
                BatchOutcome {
                    kind: BatchKind::Update,
                    ok: 0,
                    failed: 1,
                    is_undo: false,
                }
            }
        };
        let _ = tx.send(AppEvent::BatchSettled(outcome));
    });
}

/// Issue the inverse call for the recorded action and clear the record.
/// The task's position is not restored locally; the resync that follows
/// settlement reintroduces it where it belongs.
pub fn undo<A: Api>(app: &mut App<A>) {
    let Some(record) = app.undo.take() else {
        app.set_status("Nothing to undo");
        return;
    };
    info!(
        "undo: {} {}",
        if record.reopen { "reopening" } else { "closing" },
        record.id
    );
    let api = app.api.clone();
    let tx = app.events_tx.clone();
    app.handle.spawn(async move {
        let result = if record.reopen {
            api.reopen_task(&record.id).await
        } else {
            api.close_task(&record.id).await
        };
        let outcome = match result {
            Ok(()) => BatchOutcome {
                kind: if record.reopen {
                    BatchKind::Uncomplete
                } else {
                    BatchKind::Complete
                },
                ok: 1,
                failed: 0,
                is_undo: true,
            },
            Err(e) => {
                warn!("undo for {} failed: {e}", record.id);
                BatchOutcome {
                    kind: BatchKind::Uncomplete,
                    ok: 0,
                    failed: 1,
                    is_undo: true,
                }
            }
        };
        let _ = tx.send(AppEvent::BatchSettled(outcome));
    });
}

/// Shared tail of every optimistic apply: rebuild the projection with the
/// cursor restored, and clear the selection so a retry cannot act on a
/// stale multi-selection.
fn after_optimistic_apply<A: Api>(app: &mut App<A>) {
    app.reproject();
    app.cursor.clear_selection();
}

/// Dispatch one remote call per operand behind the admission gate, fan the
/// outcomes into a queue sized to the batch, and report a single settled
/// event to the control loop. Calls may complete in any order.
fn dispatch_each<A: Api>(app: &App<A>, kind: BatchKind, ids: Vec<String>) {
    let api = app.api.clone();
    let tx = app.events_tx.clone();
    let max_in_flight = app.config.sync.max_in_flight.max(1);
    app.handle.spawn(async move {
        let total = ids.len();
        let gate = Arc::new(Semaphore::new(max_in_flight));
        let (result_tx, mut result_rx) = mpsc::channel::<bool>(total);

        for id in ids {
            let api = api.clone();
            let gate = gate.clone();
            let result_tx = result_tx.clone();
            tokio::spawn(async move {
                let Ok(_permit) = gate.acquire_owned().await else {
                    return;
                };
                let result = match kind {
                    BatchKind::Complete => api.close_task(&id).await,
                    BatchKind::Uncomplete => api.reopen_task(&id).await,
                    BatchKind::Delete => api.delete_task(&id).await,
                    // Move and Update have dedicated dispatch paths.
                    BatchKind::Move | BatchKind::Update => return,
                };
                if let Err(e) = &result {
                    warn!("{kind:?} for {id} failed: {e}");
                }
                let _ = result_tx.send(result.is_ok()).await;
            });
        }
        drop(result_tx);

        let mut ok = 0;
        let mut failed = 0;
        while let Some(success) = result_rx.recv().await {
            if success {
                ok += 1;
            } else {
                failed += 1;
            }
        }
        info!("{kind:?} batch settled: {ok} ok, {failed} failed of {total}");
        let _ = tx.send(AppEvent::BatchSettled(BatchOutcome {
            kind,
            ok,
            failed,
            is_undo: false,
        }));
    });
}
