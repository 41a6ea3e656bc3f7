//! Debouncer — coalesces a burst of calls into the last one.
//!
//! Each [`Debouncer::call`] aborts the pending timer task (if it has not
//! fired yet) and schedules a new one with the latest arguments. The wrapped
//! function runs once the delay passes without another call. Nothing is
//! returned to the caller; effects happen inside the function.
//!
//! Timers run on the ambient tokio runtime, so `call` must be made from
//! within one. The pending timer is aborted on [`Debouncer::cancel`] and on
//! drop, so a debouncer never outlives its owner's teardown.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct Debouncer<T> {
    delay: Duration,
    f: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Send + 'static,
{
    pub fn new<F>(delay: Duration, f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            f: Arc::new(f),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `f(args)` after the quiet period, replacing any scheduled
    /// call that has not fired yet.
    pub fn call(&mut self, args: T) {
        self.cancel();
        let f = Arc::clone(&self.f);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f(args);
        }));
    }

    /// Drop the scheduled call, if any. A call that already fired is
    /// unaffected.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// A call is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
