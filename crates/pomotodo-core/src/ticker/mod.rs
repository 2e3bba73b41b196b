//! Periodic tick plumbing.
//!
//! A [`Scheduler`] hands out repeating subscriptions; a [`TickDriver`]
//! binds one timer to one scheduler and keeps exactly one subscription
//! alive while the timer runs.
//!
//! ## Subscription lifecycle
//!
//! ```text
//! paused -> running   cancel stale handle, schedule a new one
//! running -> paused   cancel
//! countdown expires   callback returns Break, scheduler drops it
//! driver dropped      cancel; callbacks only hold a Weak, so any tick
//!                     already in flight finds nothing to mutate
//! ```

mod manual;
mod tokio_scheduler;

pub use manual::{ManualHandle, ManualScheduler};
pub use tokio_scheduler::TokioScheduler;

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::events::Event;
use crate::signal::CompletionSignal;
use crate::timer::Countdown;

/// Cadence of every timer in the application.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Work performed on each tick. Returning `Break` ends the subscription.
pub type TickCallback = Box<dyn FnMut() -> ControlFlow<()> + Send + 'static>;

/// Receives completion events and a fresh snapshot after every tick.
pub type EventListener = Arc<dyn Fn(&Event) + Send + Sync + 'static>;

/// Periodic scheduling capability.
pub trait Scheduler {
    type Handle;

    /// Invoke `tick` every `period` until it returns `Break` or the handle
    /// is cancelled. The first invocation happens one period from now.
    fn schedule(&self, period: Duration, tick: TickCallback) -> Self::Handle;

    /// Stop a subscription. Cancelling one that already ended is a no-op.
    fn cancel(&self, handle: Self::Handle);
}

/// Owns a timer and drives it from a [`Scheduler`].
///
/// All user actions go through [`update`](Self::update) so the tick
/// subscription always matches the timer's running flag.
pub struct TickDriver<T: Countdown, S: Scheduler> {
    timer: Arc<Mutex<T>>,
    scheduler: S,
    signal: Arc<CompletionSignal>,
    listener: Option<EventListener>,
    subscription: Option<S::Handle>,
    period: Duration,
}

impl<T: Countdown, S: Scheduler> TickDriver<T, S> {
    pub fn new(timer: T, scheduler: S, signal: CompletionSignal) -> Self {
        let mut driver = Self {
            timer: Arc::new(Mutex::new(timer)),
            scheduler,
            signal: Arc::new(signal),
            listener: None,
            subscription: None,
            period: TICK_INTERVAL,
        };
        driver.sync(false);
        driver
    }

    /// Override the tick period (tests and demos).
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self.drop_stale();
        if self.subscription.is_some() {
            self.resubscribe();
        }
        self
    }

    pub fn with_listener(mut self, listener: EventListener) -> Self {
        self.listener = Some(listener);
        self.drop_stale();
        if self.subscription.is_some() {
            self.resubscribe();
        }
        self
    }

    /// Read the timer.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.timer))
    }

    /// Apply a user action, then start or stop ticking to match the
    /// timer's running flag.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let (was_running, result) = {
            let mut timer = lock(&self.timer);
            let was_running = timer.is_running();
            (was_running, f(&mut timer))
        };
        self.sync(was_running);
        result
    }

    /// Whether a live subscription drives the timer. A subscription that
    /// ended itself on expiry does not count.
    pub fn is_ticking(&self) -> bool {
        self.subscription.is_some() && lock(&self.timer).is_running()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn sync(&mut self, was_running: bool) {
        let running = lock(&self.timer).is_running();
        match (was_running, running) {
            (false, true) => self.resubscribe(),
            (true, true) if self.subscription.is_none() => self.resubscribe(),
            (true, true) => {}
            (_, false) => self.unsubscribe(),
        }
    }

    /// Forget a handle whose callback already returned `Break`.
    fn drop_stale(&mut self) {
        if !lock(&self.timer).is_running() {
            self.unsubscribe();
        }
    }

    fn resubscribe(&mut self) {
        self.unsubscribe();
        let callback = tick_callback(
            Arc::downgrade(&self.timer),
            Arc::clone(&self.signal),
            self.listener.clone(),
        );
        self.subscription = Some(self.scheduler.schedule(self.period, callback));
        tracing::trace!(period_ms = self.period.as_millis() as u64, "tick subscription started");
    }

    fn unsubscribe(&mut self) {
        if let Some(handle) = self.subscription.take() {
            self.scheduler.cancel(handle);
            tracing::trace!("tick subscription cancelled");
        }
    }
}

impl<T: Countdown, S: Scheduler> Drop for TickDriver<T, S> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn tick_callback<T: Countdown>(
    timer: Weak<Mutex<T>>,
    signal: Arc<CompletionSignal>,
    listener: Option<EventListener>,
) -> TickCallback {
    Box::new(move || {
        let Some(timer) = timer.upgrade() else {
            return ControlFlow::Break(());
        };

        let (event, snapshot, running) = {
            let mut guard = lock(&timer);
            if !guard.is_running() {
                return ControlFlow::Break(());
            }
            let event = guard.tick();
            (event, guard.snapshot(), guard.is_running())
        };

        if let Some(event) = &event {
            if let Some(completion) = event.completion() {
                signal.fire(&completion);
            }
            if let Some(listener) = &listener {
                listener(event);
            }
        }
        if let Some(listener) = &listener {
            listener(&snapshot);
        }

        if running {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{CountdownSpec, FreeTimer, SessionDurations, SessionTimer};

    #[test]
    fn idle_driver_has_no_subscription() {
        let scheduler = ManualScheduler::new();
        let driver = TickDriver::new(
            SessionTimer::default(),
            scheduler.clone(),
            CompletionSignal::silent(),
        );
        assert!(!driver.is_ticking());
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn start_then_pause_cancels() {
        let scheduler = ManualScheduler::new();
        let mut driver = TickDriver::new(
            SessionTimer::default(),
            scheduler.clone(),
            CompletionSignal::silent(),
        );
        driver.update(|t| t.start_pause());
        assert_eq!(scheduler.active(), 1);
        scheduler.advance(3);
        driver.update(|t| t.start_pause());
        assert_eq!(scheduler.active(), 0);
        scheduler.advance(3);
        assert_eq!(driver.with(|t| t.remaining().total_seconds()), 25 * 60 - 3);
    }

    #[test]
    fn edits_while_running_keep_the_same_subscription() {
        let scheduler = ManualScheduler::new();
        let mut driver = TickDriver::new(
            SessionTimer::new(SessionDurations::default()),
            scheduler.clone(),
            CompletionSignal::silent(),
        );
        driver.update(|t| t.start_pause());
        driver.update(|t| t.reconfigure(crate::timer::SessionType::LongBreak, 30));
        assert_eq!(scheduler.active(), 1);
        assert_eq!(scheduler.total_scheduled(), 1);
    }

    #[test]
    fn expiry_ends_subscription_from_inside() {
        let scheduler = ManualScheduler::new();
        let mut driver = TickDriver::new(
            FreeTimer::new(CountdownSpec::new(0, 0, 2)),
            scheduler.clone(),
            CompletionSignal::silent(),
        );
        driver.update(|t| t.start_pause());
        scheduler.advance(2);
        assert_eq!(scheduler.active(), 0);
        assert!(!driver.with(|t| t.is_running()));
        assert!(!driver.is_ticking());
    }

    #[test]
    fn builders_do_not_revive_an_expired_countdown() {
        let scheduler = ManualScheduler::new();
        let mut driver = TickDriver::new(
            FreeTimer::new(CountdownSpec::new(0, 0, 1)),
            scheduler.clone(),
            CompletionSignal::silent(),
        );
        driver.update(|t| t.start_pause());
        scheduler.advance(1);

        let driver = driver
            .with_period(Duration::from_millis(10))
            .with_listener(Arc::new(|_: &Event| {}));
        assert!(!driver.is_ticking());
        assert_eq!(scheduler.active(), 0);
        assert_eq!(scheduler.total_scheduled(), 1);
    }

    #[test]
    fn drop_cancels_subscription() {
        let scheduler = ManualScheduler::new();
        {
            let mut driver = TickDriver::new(
                SessionTimer::default(),
                scheduler.clone(),
                CompletionSignal::silent(),
            );
            driver.update(|t| t.start_pause());
            assert_eq!(scheduler.active(), 1);
        }
        assert_eq!(scheduler.active(), 0);
        scheduler.advance(5);
    }
}
