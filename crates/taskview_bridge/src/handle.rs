use std::sync::{Arc, Mutex};

type Callback = Box<dyn Fn() + Send>;

/// Shared guard around a completion callback that may outlive its owner.
///
/// A worker thread calls [`trigger`](CompletionHandle::trigger) when a task
/// body finishes; the owner calls [`clear`](CompletionHandle::clear) on
/// teardown. The mutex serializes the two, so a trigger either observes the
/// callback and invokes it, or observes an empty slot and does nothing. A
/// trigger racing teardown is an expected, silent no-op, never an error.
///
/// The callback is invoked while the lock is held, so it must be short:
/// delegate to a [`Signal`](crate::Signal) rather than doing real work.
#[derive(Clone)]
pub struct CompletionHandle {
    slot: Arc<Mutex<Option<Callback>>>,
}

impl CompletionHandle {
    pub fn new(callback: impl Fn() + Send + 'static) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(Box::new(callback)))),
        }
    }

    /// Invoke the callback if it has not been cleared. Callable from any
    /// thread; redundant triggers before clearing simply invoke it again.
    pub fn trigger(&self) {
        if let Ok(slot) = self.slot.lock() {
            if let Some(callback) = slot.as_ref() {
                callback();
            }
        }
    }

    /// Empty the slot. The owner calls this exactly once before its own
    /// state becomes invalid; any trigger arriving afterwards no-ops.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }

    /// Cheap pre-check so a worker can skip a task body whose owner is
    /// already gone.
    pub fn is_cleared(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_none()).unwrap_or(true)
    }
}
