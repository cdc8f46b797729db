use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use taskview_bridge::SignalHub;

#[test]
fn work_runs_on_the_draining_thread_not_the_requester() {
    let hub = SignalHub::new();
    let ran_on = Arc::new(Mutex::new(None));

    let slot = ran_on.clone();
    let signal = hub.signal(move || {
        *slot.lock().unwrap() = Some(thread::current().id());
    });

    let worker = thread::spawn(move || signal.request());
    worker.join().unwrap();

    // Nothing runs until the owning thread drains.
    assert!(ran_on.lock().unwrap().is_none());

    assert_eq!(hub.drain(), 1);
    assert_eq!(*ran_on.lock().unwrap(), Some(thread::current().id()));
}

#[test]
fn burst_of_requests_coalesces_to_one_run() {
    let hub = SignalHub::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = runs.clone();
    let signal = hub.signal(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    for _ in 0..100 {
        signal.request();
    }
    assert_eq!(hub.drain(), 1);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // A fresh request after the drain runs again.
    signal.request();
    assert_eq!(hub.drain(), 1);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn concurrent_requests_run_between_one_and_k_times() {
    const THREADS: usize = 8;
    const REQUESTS_PER_THREAD: usize = 50;

    let hub = SignalHub::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = runs.clone();
    let signal = hub.signal(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let signal = signal.clone();
            scope.spawn(move || {
                for _ in 0..REQUESTS_PER_THREAD {
                    signal.request();
                }
            });
        }
    });

    // All requests landed before the drain, so they coalesce to one
    // pending unit.
    hub.drain();
    let observed = runs.load(Ordering::SeqCst);
    assert_eq!(observed, 1);
}

#[test]
fn final_state_is_observed_even_when_intermediates_are_dropped() {
    let hub = SignalHub::new();
    let state = Arc::new(Mutex::new(0u64));
    let observed = Arc::new(Mutex::new(Vec::new()));

    let state_for_work = state.clone();
    let observed_for_work = observed.clone();
    let signal = hub.signal(move || {
        observed_for_work
            .lock()
            .unwrap()
            .push(*state_for_work.lock().unwrap());
    });

    thread::scope(|scope| {
        let state = state.clone();
        let signal = signal.clone();
        scope.spawn(move || {
            for value in 1..=1000u64 {
                *state.lock().unwrap() = value;
                signal.request();
            }
        });

        // Drain concurrently with the submissions; some intermediate
        // values will be skipped.
        for _ in 0..50 {
            hub.drain();
            thread::sleep(Duration::from_millis(1));
        }
    });

    // One last drain after the submitter has finished.
    hub.drain();

    let observed = observed.lock().unwrap();
    let runs = observed.len();
    assert!(runs >= 1);
    assert!(runs <= 1000);
    assert_eq!(*observed.last().unwrap(), 1000);
}

#[test]
fn distinct_signals_do_not_coalesce_with_each_other() {
    let hub = SignalHub::new();
    let first_runs = Arc::new(AtomicUsize::new(0));
    let second_runs = Arc::new(AtomicUsize::new(0));

    let counter = first_runs.clone();
    let first = hub.signal(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = second_runs.clone();
    let second = hub.signal(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    first.request();
    second.request();
    first.request();

    assert_eq!(hub.drain(), 2);
    assert_eq!(first_runs.load(Ordering::SeqCst), 1);
    assert_eq!(second_runs.load(Ordering::SeqCst), 1);
}

#[test]
fn drain_timeout_wakes_on_request() {
    let hub = SignalHub::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = runs.clone();
    let signal = hub.signal(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(hub.drain_timeout(Duration::from_millis(10)), 0);

    let worker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        signal.request();
    });
    assert_eq!(hub.drain_timeout(Duration::from_secs(5)), 1);
    worker.join().unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
