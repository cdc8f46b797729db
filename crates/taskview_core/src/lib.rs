//! Taskview core: pure snapshot reconciliation and view-model types.
mod reconcile;
mod snapshot;
mod view_model;

pub use reconcile::{reconcile, FieldChanges, ViewOp};
pub use snapshot::{StatusSnapshot, TaskId};
pub use view_model::{ViewEntry, ViewModel};
