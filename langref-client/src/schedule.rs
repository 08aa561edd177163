//! Deferred task scheduling
//!
//! Notification expiry is the only timed behavior in the client. It goes through [Scheduler] so
//! production code can run on the Tokio timer while tests drive a [ManualScheduler] clock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`, unless the returned handle is cancelled first.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Cancellation handle for a scheduled task.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Runs tasks on a Tokio runtime after sleeping for their delay.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime the caller is running on.
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::default();
        let guard = handle.clone();
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !guard.is_cancelled() {
                task();
            }
        });
        handle
    }
}

/// Virtual clock scheduler. Nothing runs until [ManualScheduler::advance] moves time forward.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    sequence: u64,
    queue: BTreeMap<(Duration, u64), (TaskHandle, Task)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Tasks still waiting to run, excluding cancelled ones.
    pub fn pending(&self) -> usize {
        self.lock()
            .queue
            .values()
            .filter(|(handle, _)| !handle.is_cancelled())
            .count()
    }

    /// Move the clock forward, running every task that falls due in deadline order.
    ///
    /// Tasks scheduled while advancing run too if their deadline is inside the window.
    pub fn advance(&self, by: Duration) {
        let target = self.now().saturating_add(by);
        loop {
            let next = {
                let mut state = self.lock();
                match state.queue.first_key_value() {
                    Some((&(deadline, _), _)) if deadline <= target => {
                        state.now = deadline;
                        state.queue.pop_first()
                    }
                    _ => None,
                }
            };
            // The lock is released before running so tasks may schedule more work.
            match next {
                Some((_, (handle, task))) => {
                    if !handle.is_cancelled() {
                        task();
                    }
                }
                None => break,
            }
        }
        self.lock().now = target;
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::default();
        let mut state = self.lock();
        let deadline = state.now.saturating_add(delay);
        state.sequence += 1;
        let key = (deadline, state.sequence);
        state.queue.insert(key, (handle.clone(), task));
        handle
    }
}
