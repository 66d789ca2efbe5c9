//! Cancellable periodic tick task
//!
//! [`every`] spawns a task on the given runtime that calls the tick closure
//! once per period until the closure breaks or the returned [`TickHandle`]
//! is cancelled.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Shortest period a ticker runs at
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Cancellation token of a running ticker
#[derive(Debug)]
pub struct TickHandle {
    abort: AbortHandle,
}

impl TickHandle {
    /// Stop future ticks; a tick already running finishes normally
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the ticker task has ended
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Call `on_tick` every `period`, first call one period from now
pub fn every<F>(runtime: &Handle, period: Duration, mut on_tick: F) -> TickHandle
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    let period = period.max(MIN_PERIOD);
    let first = Instant::now() + period;

    let task = runtime.spawn(async move {
        let mut ticker = tokio::time::interval_at(first, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if on_tick().is_break() {
                break;
            }
        }
    });

    TickHandle {
        abort: task.abort_handle(),
    }
}
