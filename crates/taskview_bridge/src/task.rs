use crate::queue::{TaskBody, TaskContext};
use crate::{CompletionHandle, SignalHub};

/// A unit of work whose completion must update UI state.
///
/// `perform_task` runs on a worker thread; `on_complete` runs on the thread
/// that owns the [`SignalHub`], exactly once per trigger while this owner is
/// alive and zero times after it is dropped. Keep the `UiTask` alive until
/// the completion no longer matters; dropping it cancels the pending
/// callback without blocking either side.
pub struct UiTask {
    task_name: String,
    handle: CompletionHandle,
    body: Option<TaskBody>,
}

impl UiTask {
    pub fn new(
        task_name: impl Into<String>,
        perform_task: impl FnOnce(&TaskContext) + Send + 'static,
        on_complete: impl Fn() + Send + Sync + 'static,
        hub: &SignalHub,
    ) -> Self {
        let signal = hub.signal(on_complete);
        let handle = CompletionHandle::new(move || signal.request());

        let worker_handle = handle.clone();
        let body: TaskBody = Box::new(move |context| {
            // Owner already gone; skip the work entirely.
            if worker_handle.is_cleared() {
                return;
            }
            perform_task(context);
            worker_handle.trigger();
        });

        Self {
            task_name: task_name.into(),
            handle,
            body: Some(body),
        }
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// The closure to submit to the queue. Yields `Some` exactly once.
    pub fn task(&mut self) -> Option<TaskBody> {
        self.body.take()
    }
}

impl Drop for UiTask {
    fn drop(&mut self) {
        self.handle.clear();
    }
}
