use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskview_bridge::{Signal, SignalHub, SubscriptionId, TaskQueue};
use taskview_core::{reconcile, TaskId, ViewModel};
use view_logging::view_trace;

/// Owns the view model and drives reconciliation passes on one thread.
///
/// The queue's status-changed callback runs on arbitrary worker threads and
/// does nothing but request the refresh signal; the actual pass runs when
/// the owning thread calls [`pump`](TaskListController::pump). Bursty
/// notification storms therefore cost one pass per pump, not one pass per
/// notification.
pub struct TaskListController<A> {
    queue: Arc<dyn TaskQueue>,
    subscription: SubscriptionId,
    hub: SignalHub,
    refresh_signal: Signal,
    refresh_requested: Arc<AtomicBool>,
    model: ViewModel,
    adapter: A,
}

impl<A: crate::ViewAdapter> TaskListController<A> {
    /// Subscribes to the queue and runs an initial pass so the adapter
    /// shows whatever is already queued.
    pub fn new(queue: Arc<dyn TaskQueue>, adapter: A) -> Self {
        let hub = SignalHub::new();
        let refresh_requested = Arc::new(AtomicBool::new(false));

        let requested = refresh_requested.clone();
        let refresh_signal = hub.signal(move || {
            requested.store(true, Ordering::SeqCst);
        });

        let callback_signal = refresh_signal.clone();
        let subscription =
            queue.add_status_changed_callback(Arc::new(move || callback_signal.request()));

        let mut controller = Self {
            queue,
            subscription,
            hub,
            refresh_signal,
            refresh_requested,
            model: ViewModel::new(),
            adapter,
        };
        controller.refresh_now();
        controller
    }

    /// The hub that marshals work onto this controller's thread. Hand it to
    /// [`UiTask`](taskview_bridge::UiTask) constructors so their completion
    /// callbacks run here during a pump.
    pub fn hub(&self) -> &SignalHub {
        &self.hub
    }

    /// Drain pending signals and run at most one reconciliation pass.
    /// Returns true if a pass ran.
    pub fn pump(&mut self) -> bool {
        self.hub.drain();
        self.run_if_requested()
    }

    /// Like [`pump`](Self::pump) but blocks up to `timeout` for the first
    /// pending signal.
    pub fn pump_timeout(&mut self, timeout: Duration) -> bool {
        self.hub.drain_timeout(timeout);
        self.run_if_requested()
    }

    /// Force a pass without waiting for a notification.
    pub fn refresh(&mut self) {
        self.refresh_signal.request();
        self.pump();
    }

    /// Forward a pause toggle to the queue. Sent even if the id vanished in
    /// a concurrent pass; the queue treats unknown ids as no-ops.
    pub fn toggle_pause(&self, task_id: TaskId) {
        self.queue.toggle_pause_task(task_id);
    }

    /// Currently selected task ids, straight from the adapter.
    pub fn selected_tasks(&self) -> Vec<TaskId> {
        self.adapter.selected_tasks()
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    fn run_if_requested(&mut self) -> bool {
        if self.refresh_requested.swap(false, Ordering::SeqCst) {
            self.refresh_now();
            true
        } else {
            false
        }
    }

    fn refresh_now(&mut self) {
        let pass = view_logging::next_pass_tick();
        let queue = self.queue.clone();
        let model = &mut self.model;
        let adapter = &mut self.adapter;
        queue.view_task_status(&mut |statuses| {
            let ops = reconcile(model, statuses);
            view_trace!(
                "pass {}: {} status rows, {} ops",
                pass,
                statuses.len(),
                ops.len()
            );
            adapter.apply(&ops);
        });
    }
}

impl<A> Drop for TaskListController<A> {
    fn drop(&mut self) {
        self.queue.remove_status_changed_callback(self.subscription);
    }
}
