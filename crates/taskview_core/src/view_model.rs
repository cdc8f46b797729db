use std::collections::HashMap;

use crate::{StatusSnapshot, TaskId};

/// Last-applied status fields for one task currently on display.
///
/// Entries mirror the most recent snapshot applied for their id; they are
/// never stale beyond one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry {
    pub task_name: String,
    pub message: String,
    pub progress: i32,
    pub complete: bool,
    pub pauseable: bool,
    pub paused: bool,
}

impl ViewEntry {
    pub(crate) fn from_snapshot(status: &StatusSnapshot) -> Self {
        Self {
            task_name: status.task_name.clone(),
            message: status.message.clone(),
            progress: status.progress,
            complete: status.complete,
            pauseable: status.pauseable,
            paused: status.paused,
        }
    }
}

/// The persistent record of what is currently displayed, keyed by task id,
/// plus the display order.
///
/// Display order invariant: every incomplete entry appears before every
/// complete entry; within each group, the order established at first
/// insertion is preserved across passes unless a task changes groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    pub(crate) order: Vec<TaskId>,
    pub(crate) entries: HashMap<TaskId, ViewEntry>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current display order, front of the list first.
    pub fn order(&self) -> &[TaskId] {
        &self.order
    }

    pub fn entry(&self, task_id: TaskId) -> Option<&ViewEntry> {
        self.entries.get(&task_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &ViewEntry)> {
        self.order.iter().map(|id| (*id, &self.entries[id]))
    }
}
