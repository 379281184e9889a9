//! Throttled callbacks on tokio timers.
//!
//! [`Throttler::first`] fires on the leading edge and ignores further calls
//! until the delay has passed. [`Throttler::last`] restarts its timer on every
//! call and fires with the latest arguments once calls stop for the whole
//! delay.
//!
//! Both spawn onto the ambient tokio runtime, so `throttle` must be called
//! from within one.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    First,
    Last,
}

struct Pending<A> {
    args: Option<A>,
    timer: Option<JoinHandle<()>>,
}

type Callback<A> = Arc<dyn Fn(A) + Send + Sync>;

pub struct Throttler<A> {
    mode: Mode,
    delay: Duration,
    callback: Callback<A>,
    pending: Arc<Mutex<Pending<A>>>,
}

fn lock<A>(pending: &Mutex<Pending<A>>) -> MutexGuard<'_, Pending<A>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A: Send + 'static> Throttler<A> {
    /// Fire immediately; calls inside the following window are dropped.
    pub fn first(delay: Duration, callback: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self::with_mode(Mode::First, delay, callback)
    }

    /// Every call restarts the timer; the last arguments win.
    pub fn last(delay: Duration, callback: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self::with_mode(Mode::Last, delay, callback)
    }

    fn with_mode(mode: Mode, delay: Duration, callback: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            mode,
            delay,
            callback: Arc::new(callback),
            pending: Arc::new(Mutex::new(Pending {
                args: None,
                timer: None,
            })),
        }
    }

    pub fn throttle(&self, args: A) {
        match self.mode {
            Mode::First => self.throttle_first(args),
            Mode::Last => self.throttle_last(args),
        }
    }

    /// Fire now and hold the window open for the delay.
    fn throttle_first(&self, args: A) {
        {
            let mut pending = lock(&self.pending);
            if pending.timer.is_some() {
                return;
            }
            let shared = Arc::clone(&self.pending);
            let delay = self.delay;
            pending.timer = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                lock(&shared).timer = None;
            }));
        }
        (self.callback)(args);
    }

    fn throttle_last(&self, args: A) {
        let mut pending = lock(&self.pending);
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.args = Some(args);

        let shared = Arc::clone(&self.pending);
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let args = {
                let mut pending = lock(&shared);
                pending.timer = None;
                pending.args.take()
            };
            if let Some(args) = args {
                callback(args);
            }
        }));
    }

    /// Drop the pending call, if any. A `first` throttler's window closes.
    pub fn cancel(&self) {
        let mut pending = lock(&self.pending);
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.args = None;
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending).timer.is_some()
    }
}

impl<A> Clone for Throttler<A> {
    fn clone(&self) -> Self {
        Self {
            mode: self.mode,
            delay: self.delay,
            callback: Arc::clone(&self.callback),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<A> fmt::Debug for Throttler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttler")
            .field("mode", &self.mode)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
