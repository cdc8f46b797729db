use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use taskview_core::{StatusSnapshot, TaskId};
use thiserror::Error;
use view_logging::{view_debug, view_warn};

/// Zero-argument notifier the queue invokes, on arbitrary threads, whenever
/// any task's status changes.
pub type StatusCallback = Arc<dyn Fn() + Send + Sync>;

/// Token returned by [`TaskQueue::add_status_changed_callback`].
pub type SubscriptionId = u64;

/// The closure a task owner submits to the queue; runs on a worker thread.
pub type TaskBody = Box<dyn FnOnce(&TaskContext) + Send>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue is stopped")]
    Stopped,
}

/// Capability set this workspace consumes from a task queue.
///
/// Any implementation with these operations suffices; the view side never
/// depends on scheduling or execution semantics.
pub trait TaskQueue: Send + Sync {
    fn add_status_changed_callback(&self, callback: StatusCallback) -> SubscriptionId;

    fn remove_status_changed_callback(&self, id: SubscriptionId);

    /// Invoke `f` once, synchronously, with a consistent point-in-time view
    /// of the ordered task statuses.
    fn view_task_status(&self, f: &mut dyn FnMut(&[StatusSnapshot]));

    /// Fire-and-forget pause toggle. Unknown ids are ignored, so commands
    /// racing a task's removal are harmless.
    fn toggle_pause_task(&self, task_id: TaskId);
}

struct QueueInner {
    statuses: Vec<StatusSnapshot>,
    callbacks: HashMap<SubscriptionId, StatusCallback>,
    workers: Vec<JoinHandle<()>>,
    stopped: bool,
}

impl QueueInner {
    fn status_mut(&mut self, task_id: TaskId) -> Option<&mut StatusSnapshot> {
        self.statuses.iter_mut().find(|s| s.task_id == task_id)
    }
}

/// A small thread-backed queue: each submitted body runs on its own worker
/// thread, and every status mutation fires the subscribed callbacks.
///
/// This is the in-process stand-in for a production queue; the view side
/// only talks to it through [`TaskQueue`].
pub struct WorkerQueue {
    inner: Arc<Mutex<QueueInner>>,
    next_task_id: AtomicI64,
    next_subscription: AtomicU64,
}

impl WorkerQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner {
                statuses: Vec::new(),
                callbacks: HashMap::new(),
                workers: Vec::new(),
                stopped: false,
            })),
            next_task_id: AtomicI64::new(1),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Run `body` on a worker thread. The task appears in the status list
    /// immediately and is marked complete when the body returns.
    pub fn submit(
        &self,
        task_name: impl Into<String>,
        pauseable: bool,
        body: TaskBody,
    ) -> Result<TaskId, QueueError> {
        let task_id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let mut status = StatusSnapshot::new(task_id, task_name);
        status.pauseable = pauseable;

        let context = TaskContext {
            task_id,
            inner: self.inner.clone(),
        };

        {
            let mut inner = lock(&self.inner)?;
            if inner.stopped {
                return Err(QueueError::Stopped);
            }
            view_debug!("submit task {} '{}'", task_id, status.task_name);
            inner.statuses.push(status);

            // The worker blocks on this lock for its first status mutation,
            // so registering it here cannot be missed by stop().
            let worker = thread::spawn(move || {
                body(&context);
                context.finish();
            });
            inner.workers.push(worker);
        }
        notify(&self.inner);

        Ok(task_id)
    }

    /// Refuse further submissions and wait for running workers to finish.
    pub fn stop(&self) {
        let workers = match self.inner.lock() {
            Ok(mut inner) => {
                inner.stopped = true;
                std::mem::take(&mut inner.workers)
            }
            Err(_) => Vec::new(),
        };
        for worker in workers {
            if worker.join().is_err() {
                view_warn!("worker thread panicked during shutdown");
            }
        }
    }
}

impl Default for WorkerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue for WorkerQueue {
    fn add_status_changed_callback(&self, callback: StatusCallback) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut inner) = self.inner.lock() {
            inner.callbacks.insert(id, callback);
        }
        id
    }

    fn remove_status_changed_callback(&self, id: SubscriptionId) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.callbacks.remove(&id);
        }
    }

    fn view_task_status(&self, f: &mut dyn FnMut(&[StatusSnapshot])) {
        if let Ok(inner) = self.inner.lock() {
            f(&inner.statuses);
        }
    }

    fn toggle_pause_task(&self, task_id: TaskId) {
        let toggled = match self.inner.lock() {
            Ok(mut inner) => match inner.status_mut(task_id) {
                Some(status) if status.pauseable && !status.complete => {
                    status.paused = !status.paused;
                    true
                }
                _ => false,
            },
            Err(_) => false,
        };
        if toggled {
            notify(&self.inner);
        }
    }
}

/// Handed to a running task body so it can publish progress.
pub struct TaskContext {
    task_id: TaskId,
    inner: Arc<Mutex<QueueInner>>,
}

impl TaskContext {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.mutate(|status| status.message = message.into());
    }

    /// `progress` is clamped to −1..=100; negative means indeterminate.
    pub fn set_progress(&self, progress: i32) {
        self.mutate(|status| status.progress = progress.clamp(-1, 100));
    }

    /// Advisory: bodies that honor pausing poll this between steps.
    pub fn is_paused(&self) -> bool {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| {
                inner
                    .statuses
                    .iter()
                    .find(|s| s.task_id == self.task_id)
                    .map(|s| s.paused)
            })
            .unwrap_or(false)
    }

    fn finish(&self) {
        self.mutate(|status| {
            status.complete = true;
            status.paused = false;
            if status.progress >= 0 {
                status.progress = 100;
            }
        });
    }

    fn mutate(&self, apply: impl FnOnce(&mut StatusSnapshot)) {
        let changed = match self.inner.lock() {
            Ok(mut inner) => match inner.status_mut(self.task_id) {
                Some(status) => {
                    apply(status);
                    true
                }
                None => false,
            },
            Err(_) => false,
        };
        if changed {
            notify(&self.inner);
        }
    }
}

fn lock(inner: &Arc<Mutex<QueueInner>>) -> Result<std::sync::MutexGuard<'_, QueueInner>, QueueError> {
    inner.lock().map_err(|_| QueueError::Stopped)
}

// Callbacks run outside the queue lock; they are expected to be short
// (typically one `Signal::request`).
fn notify(inner: &Arc<Mutex<QueueInner>>) {
    let callbacks: Vec<StatusCallback> = match inner.lock() {
        Ok(inner) => inner.callbacks.values().cloned().collect(),
        Err(_) => return,
    };
    for callback in callbacks {
        callback();
    }
}
