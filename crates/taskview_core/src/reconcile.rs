use crate::view_model::ViewEntry;
use crate::{StatusSnapshot, TaskId, ViewModel};

/// Dirty-field diff between a view entry and the snapshot applied to it.
///
/// Only changed fields are populated, so an adapter can redraw the minimum.
/// `tooltip` is set whenever `task_name` or `message` changed, since those
/// two are typically rendered together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldChanges {
    pub task_name: Option<String>,
    pub message: Option<String>,
    pub progress: Option<i32>,
    pub complete: Option<bool>,
    pub pauseable: Option<bool>,
    pub paused: Option<bool>,
    pub tooltip: bool,
}

impl FieldChanges {
    pub fn is_empty(&self) -> bool {
        self.task_name.is_none()
            && self.message.is_none()
            && self.progress.is_none()
            && self.complete.is_none()
            && self.pauseable.is_none()
            && self.paused.is_none()
    }

    fn diff(entry: &mut ViewEntry, status: &StatusSnapshot) -> Self {
        let mut changes = FieldChanges::default();

        if entry.task_name != status.task_name {
            entry.task_name = status.task_name.clone();
            changes.task_name = Some(status.task_name.clone());
            changes.tooltip = true;
        }

        if entry.message != status.message {
            entry.message = status.message.clone();
            changes.message = Some(status.message.clone());
            changes.tooltip = true;
        }

        if entry.progress != status.progress {
            entry.progress = status.progress;
            changes.progress = Some(status.progress);
        }

        if entry.complete != status.complete {
            entry.complete = status.complete;
            changes.complete = Some(status.complete);
        }

        if entry.pauseable != status.pauseable {
            entry.pauseable = status.pauseable;
            changes.pauseable = Some(status.pauseable);
        }

        if entry.paused != status.paused {
            entry.paused = status.paused;
            changes.paused = Some(status.paused);
        }

        changes
    }
}

/// One mutation for the view adapter to apply.
///
/// Operations are emitted in application order: creates and updates in
/// snapshot order, then moves, then removals. Move indices refer to the
/// list as it stands before removals, so adapters must apply removals last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOp {
    /// Insert a new entry; new tasks surface at the front of the list.
    Create {
        index: usize,
        snapshot: StatusSnapshot,
    },
    /// Redraw only the changed fields of an existing entry.
    Update {
        task_id: TaskId,
        changes: FieldChanges,
    },
    /// Relocate an entry from `from` to the earlier slot `to`.
    Move {
        task_id: TaskId,
        from: usize,
        to: usize,
    },
    /// Delete the entry and its UI element together.
    Remove { task_id: TaskId },
}

/// One reconciliation pass: diff `statuses` against the view model, mutate
/// the model in place, and return the operations for the adapter.
///
/// Ids present in the model but absent from `statuses` are removed in this
/// same pass. Duplicate ids within one snapshot are tolerated; the last
/// occurrence wins. An empty snapshot removes every entry.
pub fn reconcile(model: &mut ViewModel, statuses: &[StatusSnapshot]) -> Vec<ViewOp> {
    let mut ops = Vec::new();

    // Ids displayed last pass; anything still here after the snapshot loop
    // has vanished and gets removed.
    let mut vanished: Vec<TaskId> = model.order.clone();

    for status in statuses {
        vanished.retain(|id| *id != status.task_id);

        match model.entries.get_mut(&status.task_id) {
            None => {
                model.order.insert(0, status.task_id);
                model
                    .entries
                    .insert(status.task_id, ViewEntry::from_snapshot(status));
                ops.push(ViewOp::Create {
                    index: 0,
                    snapshot: status.clone(),
                });
            }
            Some(entry) => {
                let changes = FieldChanges::diff(entry, status);
                if !changes.is_empty() {
                    ops.push(ViewOp::Update {
                        task_id: status.task_id,
                        changes,
                    });
                }
            }
        }
    }

    // Stable partition: incomplete entries first. A single linear pass that
    // relocates only out-of-place entries, so the number of moves is
    // proportional to how many entries are out of order. Entries about to
    // be removed keep their last-known group so live indices stay valid.
    let mut c = 0;
    for r in 0..model.order.len() {
        let task_id = model.order[r];
        if model.entries[&task_id].complete {
            continue;
        }
        if r != c {
            model.order.remove(r);
            model.order.insert(c, task_id);
            ops.push(ViewOp::Move {
                task_id,
                from: r,
                to: c,
            });
        }
        c += 1;
    }

    // Removals come last so the move indices above stay valid.
    for task_id in vanished {
        model.entries.remove(&task_id);
        model.order.retain(|id| *id != task_id);
        ops.push(ViewOp::Remove { task_id });
    }

    ops
}
