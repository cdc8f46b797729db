use taskview_core::{FieldChanges, StatusSnapshot, TaskId, ViewOp};

/// Seam between the reconciliation engine and a concrete rendering
/// technology. Implementations mutate whatever UI elements represent the
/// entries; the engine never holds a lock across these calls.
///
/// Operations arrive in the order the engine emitted them; removals come
/// last, after moves, so move indices stay valid.
pub trait ViewAdapter {
    fn create(&mut self, index: usize, snapshot: &StatusSnapshot);

    fn update(&mut self, task_id: TaskId, changes: &FieldChanges);

    fn move_entry(&mut self, task_id: TaskId, from: usize, to: usize);

    fn remove(&mut self, task_id: TaskId);

    /// Pass-through from whatever selection mechanism the adapter uses.
    fn selected_tasks(&self) -> Vec<TaskId>;

    fn apply(&mut self, ops: &[ViewOp]) {
        for op in ops {
            match op {
                ViewOp::Create { index, snapshot } => self.create(*index, snapshot),
                ViewOp::Update { task_id, changes } => self.update(*task_id, changes),
                ViewOp::Move { task_id, from, to } => self.move_entry(*task_id, *from, *to),
                ViewOp::Remove { task_id } => self.remove(*task_id),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    task_id: TaskId,
    task_name: String,
    message: String,
    tooltip: String,
    progress: i32,
    complete: bool,
    pauseable: bool,
    paused: bool,
    selected: bool,
}

impl Row {
    fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        Self {
            task_id: snapshot.task_id,
            task_name: snapshot.task_name.clone(),
            message: snapshot.message.clone(),
            tooltip: tooltip_text(&snapshot.task_name, &snapshot.message),
            progress: snapshot.progress,
            complete: snapshot.complete,
            pauseable: snapshot.pauseable,
            paused: snapshot.paused,
            selected: false,
        }
    }
}

fn tooltip_text(task_name: &str, message: &str) -> String {
    format!("{}. {}", task_name, message)
}

/// Terminal rendering of the task list: one line per entry, in display
/// order. Also usable as a plain in-memory adapter for tests.
#[derive(Debug, Default)]
pub struct TextListAdapter {
    rows: Vec<Row>,
}

impl TextListAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Task ids in display order.
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.rows.iter().map(|row| row.task_id).collect()
    }

    pub fn tooltip(&self, task_id: TaskId) -> Option<&str> {
        self.row(task_id).map(|row| row.tooltip.as_str())
    }

    /// Mark or unmark an entry as selected. Ignores unknown ids.
    pub fn set_selected(&mut self, task_id: TaskId, selected: bool) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.task_id == task_id) {
            row.selected = selected;
        }
    }

    /// Rendered lines, one per entry, in display order.
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(render_line).collect()
    }

    fn row(&self, task_id: TaskId) -> Option<&Row> {
        self.rows.iter().find(|row| row.task_id == task_id)
    }
}

fn render_line(row: &Row) -> String {
    let marker = if row.complete {
        "done"
    } else if row.paused {
        "paused"
    } else {
        "active"
    };

    // Negative progress is indeterminate; render no bar for it.
    let progress = if row.progress < 0 {
        "  ...".to_string()
    } else {
        format!("{:4}%", row.progress)
    };

    let pause = if row.pauseable && !row.complete {
        if row.paused {
            " [resume]"
        } else {
            " [pause]"
        }
    } else {
        ""
    };

    let selected = if row.selected { "*" } else { " " };

    format!(
        "{}[{:6}] {} {} - {}{}",
        selected, marker, progress, row.task_name, row.message, pause
    )
}

impl ViewAdapter for TextListAdapter {
    fn create(&mut self, index: usize, snapshot: &StatusSnapshot) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, Row::from_snapshot(snapshot));
    }

    fn update(&mut self, task_id: TaskId, changes: &FieldChanges) {
        let Some(row) = self.rows.iter_mut().find(|row| row.task_id == task_id) else {
            return;
        };
        if let Some(task_name) = &changes.task_name {
            row.task_name = task_name.clone();
        }
        if let Some(message) = &changes.message {
            row.message = message.clone();
        }
        if changes.tooltip {
            row.tooltip = tooltip_text(&row.task_name, &row.message);
        }
        if let Some(progress) = changes.progress {
            row.progress = progress;
        }
        if let Some(complete) = changes.complete {
            row.complete = complete;
        }
        if let Some(pauseable) = changes.pauseable {
            row.pauseable = pauseable;
        }
        if let Some(paused) = changes.paused {
            row.paused = paused;
        }
    }

    fn move_entry(&mut self, task_id: TaskId, from: usize, to: usize) {
        if from >= self.rows.len() || self.rows[from].task_id != task_id {
            return;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to.min(self.rows.len()), row);
    }

    fn remove(&mut self, task_id: TaskId) {
        self.rows.retain(|row| row.task_id != task_id);
    }

    fn selected_tasks(&self) -> Vec<TaskId> {
        self.rows
            .iter()
            .filter(|row| row.selected)
            .map(|row| row.task_id)
            .collect()
    }
}
