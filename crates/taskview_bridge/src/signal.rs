use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

type Work = Arc<dyn Fn() + Send + Sync>;

struct PendingWork {
    pending: Arc<AtomicBool>,
    work: Work,
}

/// Owning-thread end of the cross-thread signalling channel.
///
/// Create the hub on the thread that owns view state and keep it there.
/// [`signal`](SignalHub::signal) registers a unit of deferred work; the
/// returned [`Signal`] may be cloned into worker threads, and the work runs
/// only when the owning thread drains the hub. Work never executes
/// synchronously on the requesting thread.
pub struct SignalHub {
    tx: Sender<PendingWork>,
    rx: Receiver<PendingWork>,
}

impl SignalHub {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Register `work` and get the worker-side handle that requests it.
    pub fn signal(&self, work: impl Fn() + Send + Sync + 'static) -> Signal {
        Signal {
            pending: Arc::new(AtomicBool::new(false)),
            work: Arc::new(work),
            tx: self.tx.clone(),
        }
    }

    /// Run every piece of work requested since the last drain, on the
    /// calling thread. Returns how many work items ran.
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        while let Ok(item) = self.rx.try_recv() {
            run_item(&item);
            ran += 1;
        }
        ran
    }

    /// Block up to `timeout` for the first request, then drain the rest.
    pub fn drain_timeout(&self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(item) => {
                run_item(&item);
                1 + self.drain()
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }
}

impl Default for SignalHub {
    fn default() -> Self {
        Self::new()
    }
}

fn run_item(item: &PendingWork) {
    // Clear before running so a request arriving mid-work queues a fresh
    // round instead of being lost.
    item.pending.store(false, Ordering::SeqCst);
    (item.work)();
}

/// Worker-side handle: ask the owning thread to run the registered work.
#[derive(Clone)]
pub struct Signal {
    pending: Arc<AtomicBool>,
    work: Work,
    tx: Sender<PendingWork>,
}

impl Signal {
    /// Request one execution on the owning thread. Callable from any
    /// thread; non-blocking. Bursts coalesce to at most one pending unit,
    /// so K requests before the next drain produce between 1 and K runs.
    pub fn request(&self) {
        if self.pending.swap(true, Ordering::SeqCst) {
            return;
        }
        let item = PendingWork {
            pending: self.pending.clone(),
            work: self.work.clone(),
        };
        if self.tx.send(item).is_err() {
            // Hub is gone; nothing will run this work again.
            self.pending.store(false, Ordering::SeqCst);
        }
    }
}
