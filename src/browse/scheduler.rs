// Input Schedulers
//
// Debouncer: one pending timer per controller, replaced on every event.
// Throttler: leading-edge gate, at most one pass per interval.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub struct Debouncer {
    delay: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Timers run on `runtime`, so `schedule` may be called from any thread.
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self { delay, runtime, pending: Mutex::new(None) }
    }

    /// Cancel the pending timer (if any) and arm a new one that runs `work`
    /// once `delay` passes without another call. Once the timer fires the
    /// work is detached, so a later event cannot abort it halfway.
    pub fn schedule<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let runtime = self.runtime.clone();
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            runtime.spawn(work);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(timer) {
            previous.abort();
        }
    }

    /// Drop the pending timer without running it
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(false, |timer| !timer.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct Throttler {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttler {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: Mutex::new(None) }
    }

    /// True when the caller may proceed. The first call passes; later calls
    /// pass only once `interval` has elapsed since the last pass.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        match *last {
            Some(at) if now.duration_since(at) < self.interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}
