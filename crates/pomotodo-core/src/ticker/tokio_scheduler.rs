use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{Scheduler, TickCallback};

/// Scheduler backed by a tokio interval task per subscription.
///
/// Cancelling aborts the task. Late ticks are delayed rather than fired in
/// a burst, so a stalled runtime never replays a backlog of seconds.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Use the runtime of the calling context.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new() -> Self {
        Self::with_handle(Handle::current())
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = JoinHandle<()>;

    fn schedule(&self, period: Duration, mut tick: TickCallback) -> JoinHandle<()> {
        self.runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tick().is_break() {
                    break;
                }
            }
        })
    }

    fn cancel(&self, handle: JoinHandle<()>) {
        handle.abort();
    }
}
