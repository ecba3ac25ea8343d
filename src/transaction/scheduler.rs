//! Timer scheduling for the transaction flow

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Work run when a timer elapses
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Source of one-shot timers
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`, unless the returned handle is
    /// cancelled first.
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;
}

impl<S: Scheduler + ?Sized> Scheduler for std::sync::Arc<S> {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        (**self).schedule(delay, task)
    }
}

/// Cancellation handle for a scheduled timer
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Timers backed by tokio tasks
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => task(),
                () = cancelled.cancelled() => {}
            }
        });
        TimerHandle::new(token)
    }
}
