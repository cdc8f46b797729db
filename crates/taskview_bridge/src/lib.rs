//! Taskview bridge: cross-thread plumbing between worker threads and the
//! single thread that owns view state.
mod handle;
mod queue;
mod signal;
mod task;

pub use handle::CompletionHandle;
pub use queue::{
    QueueError, StatusCallback, SubscriptionId, TaskBody, TaskContext, TaskQueue, WorkerQueue,
};
pub use signal::{Signal, SignalHub};
pub use task::UiTask;
