//! Cancellable periodic tick task.
//!
//! The show clock's 100 ms tick is a cooperative, single-threaded task:
//! callbacks are plain (non-`Send`) closures, so the task is spawned on the
//! current thread's `LocalSet`. The ticker runs only while the show is
//! playing; every hold, completion, or stop cancels it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Tick period used by show sessions.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Handle to a repeating tick task.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Creates an idle ticker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ticking every `period`, replacing any running tick task.
    ///
    /// The first callback fires one full period after start; the caller is
    /// expected to have emitted its own immediate update already. The task
    /// ends on its own when the callback returns `false`, which lets a tick
    /// that completes the show retire its own timer.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio `LocalSet` context.
    pub fn start(&mut self, period: Duration, mut on_tick: impl FnMut() -> bool + 'static) {
        self.stop();
        self.handle = Some(tokio::task::spawn_local(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it so
            // the callback cadence starts one period from now.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        }));
    }

    /// Cancels the tick task. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// True while a tick task is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
