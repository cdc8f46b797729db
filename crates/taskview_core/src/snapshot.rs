use serde::{Deserialize, Serialize};

/// Stable task identifier, assigned by the external queue.
pub type TaskId = i64;

/// The externally visible state of one task at a point in time.
///
/// Snapshots arrive as an ordered sequence from the queue; the order only
/// matters in that relative order within a completion group is preserved by
/// the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub task_id: TaskId,
    pub task_name: String,
    pub message: String,
    /// −1 means indeterminate, otherwise 0–100.
    pub progress: i32,
    pub complete: bool,
    pub pauseable: bool,
    pub paused: bool,
}

impl StatusSnapshot {
    /// A freshly queued task: no message yet, indeterminate progress.
    pub fn new(task_id: TaskId, task_name: impl Into<String>) -> Self {
        Self {
            task_id,
            task_name: task_name.into(),
            message: String::new(),
            progress: -1,
            complete: false,
            pauseable: false,
            paused: false,
        }
    }

    /// Negative progress disables any progress-proportional rendering.
    pub fn is_indeterminate(&self) -> bool {
        self.progress < 0
    }
}
