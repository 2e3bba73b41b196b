use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::{Scheduler, TickCallback};

/// Handle returned by [`ManualScheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManualHandle(u64);

#[derive(Default)]
struct Subscriptions {
    next_id: u64,
    active: BTreeMap<u64, TickCallback>,
}

/// Deterministic scheduler that only fires when told to.
///
/// Clones share the same subscription table, so a test can keep one
/// clone and hand the other to a [`TickDriver`](super::TickDriver).
/// The period is ignored: every [`advance`](Self::advance) step fires each
/// live subscription once.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<Subscriptions>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every live subscription `ticks` times, in subscription order.
    pub fn advance(&self, ticks: u32) {
        for _ in 0..ticks {
            let mut subs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            subs.active.retain(|_, tick| tick().is_continue());
        }
    }

    /// Number of live subscriptions.
    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .len()
    }

    /// Number of subscriptions ever created.
    pub fn total_scheduled(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_id
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, _period: Duration, tick: TickCallback) -> ManualHandle {
        let mut subs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = subs.next_id;
        subs.next_id += 1;
        subs.active.insert(id, tick);
        ManualHandle(id)
    }

    fn cancel(&self, handle: ManualHandle) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .remove(&handle.0);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("active", &self.active())
            .finish()
    }
}
