use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use taskview_bridge::{SignalHub, TaskQueue, UiTask, WorkerQueue};

#[test]
fn completion_runs_exactly_once_on_the_owning_thread() {
    let hub = SignalHub::new();
    let queue = WorkerQueue::new();

    let completions = Arc::new(AtomicUsize::new(0));
    let performed = Arc::new(AtomicUsize::new(0));

    let owning_thread = thread::current().id();
    let completions_for_task = completions.clone();
    let performed_for_task = performed.clone();
    let mut ui_task = UiTask::new(
        "compact storage",
        move |_ctx| {
            performed_for_task.fetch_add(1, Ordering::SeqCst);
        },
        move || {
            assert_eq!(thread::current().id(), owning_thread);
            completions_for_task.fetch_add(1, Ordering::SeqCst);
        },
        &hub,
    );

    let body = ui_task.task().expect("first take yields the body");
    assert!(ui_task.task().is_none());

    queue
        .submit(ui_task.task_name(), false, body)
        .expect("submit");

    // Pump the hub until the completion lands.
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while completions.load(Ordering::SeqCst) == 0 {
        assert!(std::time::Instant::now() < deadline, "completion never ran");
        hub.drain_timeout(Duration::from_millis(50));
    }

    queue.stop();
    hub.drain();

    assert_eq!(performed.load(Ordering::SeqCst), 1);
    assert_eq!(completions.load(Ordering::SeqCst), 1);

    let mut complete_flags = Vec::new();
    queue.view_task_status(&mut |statuses| {
        complete_flags = statuses.iter().map(|s| s.complete).collect();
    });
    assert_eq!(complete_flags, vec![true]);
}

#[test]
fn dropping_the_owner_cancels_the_completion() {
    let hub = SignalHub::new();
    let queue = WorkerQueue::new();

    let completions = Arc::new(AtomicUsize::new(0));
    let performed = Arc::new(AtomicUsize::new(0));

    let completions_for_task = completions.clone();
    let performed_for_task = performed.clone();
    let mut ui_task = UiTask::new(
        "doomed",
        move |_ctx| {
            performed_for_task.fetch_add(1, Ordering::SeqCst);
        },
        move || {
            completions_for_task.fetch_add(1, Ordering::SeqCst);
        },
        &hub,
    );
    let body = ui_task.task().expect("body");

    // Owner goes away before the worker ever runs.
    drop(ui_task);

    queue.submit("doomed", false, body).expect("submit");
    queue.stop();
    hub.drain();

    // The body saw the cleared handle and skipped both the work and the
    // completion.
    assert_eq!(performed.load(Ordering::SeqCst), 0);
    assert_eq!(completions.load(Ordering::SeqCst), 0);
}

#[test]
fn owner_dropped_mid_flight_suppresses_only_the_completion() {
    let hub = SignalHub::new();
    let queue = WorkerQueue::new();

    let completions = Arc::new(AtomicUsize::new(0));
    let (started_tx, started_rx) = std::sync::mpsc::channel();
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

    let completions_for_task = completions.clone();
    let mut ui_task = UiTask::new(
        "slow",
        move |_ctx| {
            started_tx.send(()).unwrap();
            // Hold the worker until the owner has been dropped.
            release_rx.recv().unwrap();
        },
        move || {
            completions_for_task.fetch_add(1, Ordering::SeqCst);
        },
        &hub,
    );
    let body = ui_task.task().expect("body");
    queue.submit("slow", false, body).expect("submit");

    started_rx.recv().unwrap();
    drop(ui_task);
    release_tx.send(()).unwrap();

    queue.stop();
    hub.drain();
    assert_eq!(completions.load(Ordering::SeqCst), 0);
}
