//! Pomodoro session timer.
//!
//! A tick-driven state machine. It owns no thread or interval of its own;
//! a [`TickDriver`](crate::ticker::TickDriver) calls `tick()` once per
//! second while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle(s) <-> Running(s)                  start_pause
//! Running(s) --tick at 00:00--> Running(s.next())
//! *(s) --reset / reconfigure(s, _)--> Idle(s)
//! ```
//!
//! There is no terminal state: Work, Short Break and Long Break rotate
//! forever and the timer keeps running across the hand-over.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::input;
use super::session::{SessionDurations, SessionType};
use super::Countdown;
use crate::events::{Event, TimerKind};

/// Rotating Pomodoro countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTimer {
    durations: SessionDurations,
    current: SessionType,
    remaining: Clock,
    running: bool,
}

impl SessionTimer {
    /// Create an idle timer positioned at the start of a Work session.
    pub fn new(durations: SessionDurations) -> Self {
        Self {
            remaining: Clock::from_minutes(durations.get(SessionType::Work)),
            durations,
            current: SessionType::Work,
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_session(&self) -> SessionType {
        self.current
    }

    pub fn remaining(&self) -> Clock {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn durations(&self) -> &SessionDurations {
        &self.durations
    }

    /// Full length of the current session in seconds.
    pub fn total_secs(&self) -> u64 {
        u64::from(self.durations.get(self.current)) * 60
    }

    /// 0.0 .. 100.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining.total_seconds());
        (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn snapshot(&self) -> Event {
        Event::SessionSnapshot {
            session_type: self.current,
            remaining: self.remaining,
            total_secs: self.total_secs(),
            running: self.running,
            progress_pct: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Toggle between running and paused. Never touches the clock or the
    /// session type.
    pub fn start_pause(&mut self) -> Event {
        self.running = !self.running;
        let remaining_secs = self.remaining.total_seconds();
        let at = Utc::now();
        if self.running {
            Event::TimerStarted {
                timer: TimerKind::Session,
                remaining_secs,
                at,
            }
        } else {
            Event::TimerPaused {
                timer: TimerKind::Session,
                remaining_secs,
                at,
            }
        }
    }

    /// Reload the full duration of the current session and stop.
    pub fn reset(&mut self) -> Event {
        self.remaining = Clock::from_minutes(self.durations.get(self.current));
        self.running = false;
        Event::TimerReset {
            timer: TimerKind::Session,
            remaining_secs: self.remaining.total_seconds(),
            at: Utc::now(),
        }
    }

    /// Change the duration of `session`, clamped to at least one minute.
    ///
    /// Editing the active session discards its countdown: the clock is
    /// reloaded with the new length and the timer stops.
    pub fn reconfigure(&mut self, session: SessionType, minutes: i64) -> Event {
        let minutes = self.durations.set(session, minutes);
        let stopped = session == self.current;
        if stopped {
            self.remaining = Clock::from_minutes(minutes);
            self.running = false;
        }
        tracing::debug!(session = %session, minutes, stopped, "session duration changed");
        Event::SessionDurationChanged {
            session_type: session,
            minutes,
            stopped,
            at: Utc::now(),
        }
    }

    /// Same as [`reconfigure`](Self::reconfigure) for raw editor text.
    /// Non-numeric or non-positive input becomes one minute.
    pub fn reconfigure_from_input(&mut self, session: SessionType, raw: &str) -> Event {
        self.reconfigure(session, i64::from(input::session_minutes(raw)))
    }

    /// Advance one second. Returns `Some(Event::SessionCompleted)` when the
    /// clock was already at zero and the timer rotated into the next session.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }

        if self.remaining.is_zero() {
            let completed = self.current;
            let next = completed.next();
            self.current = next;
            self.remaining = Clock::from_minutes(self.durations.get(next));
            self.running = true;
            tracing::info!(completed = %completed, next = %next, "session completed");
            return Some(Event::SessionCompleted {
                completed,
                next,
                at: Utc::now(),
            });
        }

        self.remaining = self.remaining.decrement();
        None
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(SessionDurations::default())
    }
}

impl Countdown for SessionTimer {
    fn tick(&mut self) -> Option<Event> {
        SessionTimer::tick(self)
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn snapshot(&self) -> Event {
        SessionTimer::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(durations: SessionDurations) -> SessionTimer {
        let mut timer = SessionTimer::new(durations);
        timer.start_pause();
        timer
    }

    #[test]
    fn starts_idle_at_work() {
        let timer = SessionTimer::default();
        assert_eq!(timer.current_session(), SessionType::Work);
        assert_eq!(timer.remaining(), Clock::from_minutes(25));
        assert!(!timer.is_running());
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn start_pause_toggles_only_running() {
        let mut timer = SessionTimer::default();
        assert!(matches!(timer.start_pause(), Event::TimerStarted { .. }));
        assert!(timer.is_running());
        assert!(matches!(timer.start_pause(), Event::TimerPaused { .. }));
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), Clock::from_minutes(25));
        assert_eq!(timer.current_session(), SessionType::Work);
    }

    #[test]
    fn tick_is_inert_while_paused() {
        let mut timer = SessionTimer::default();
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining(), Clock::from_minutes(25));
    }

    #[test]
    fn tick_borrows_across_minute_boundary() {
        let mut timer = running(SessionDurations::new(5, 5, 15));
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining(), Clock::new(4, 59));
    }

    #[test]
    fn tick_at_zero_rotates_and_keeps_running() {
        let mut timer = running(SessionDurations::new(1, 2, 3));
        for _ in 0..60 {
            assert!(timer.tick().is_none());
        }
        assert!(timer.remaining().is_zero());
        assert_eq!(timer.progress(), 100.0);

        let event = timer.tick().unwrap();
        assert!(matches!(
            event,
            Event::SessionCompleted {
                completed: SessionType::Work,
                next: SessionType::ShortBreak,
                ..
            }
        ));
        assert!(timer.is_running());
        assert_eq!(timer.current_session(), SessionType::ShortBreak);
        assert_eq!(timer.remaining(), Clock::from_minutes(2));
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn reset_keeps_session_type() {
        let mut timer = running(SessionDurations::new(1, 2, 3));
        for _ in 0..=61 {
            timer.tick();
        }
        assert_eq!(timer.current_session(), SessionType::ShortBreak);
        timer.reset();
        assert_eq!(timer.current_session(), SessionType::ShortBreak);
        assert_eq!(timer.remaining(), Clock::from_minutes(2));
        assert!(!timer.is_running());
    }

    #[test]
    fn reconfigure_active_session_stops_and_reloads() {
        let mut timer = running(SessionDurations::default());
        timer.tick();
        let event = timer.reconfigure(SessionType::Work, 40);
        assert!(matches!(
            event,
            Event::SessionDurationChanged {
                minutes: 40,
                stopped: true,
                ..
            }
        ));
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), Clock::from_minutes(40));
    }

    #[test]
    fn reconfigure_other_session_leaves_countdown_alone() {
        let mut timer = running(SessionDurations::default());
        timer.tick();
        timer.reconfigure(SessionType::LongBreak, 20);
        assert!(timer.is_running());
        assert_eq!(timer.remaining(), Clock::new(24, 59));
        assert_eq!(timer.durations().get(SessionType::LongBreak), 20);
    }

    #[test]
    fn reconfigure_clamps_to_one_minute() {
        let mut timer = SessionTimer::default();
        timer.reconfigure(SessionType::Work, 0);
        assert_eq!(timer.durations().get(SessionType::Work), 1);
        assert_eq!(timer.remaining(), Clock::from_minutes(1));
    }

    #[test]
    fn reconfigure_from_garbage_input_uses_one_minute() {
        let mut timer = SessionTimer::default();
        timer.reconfigure_from_input(SessionType::ShortBreak, "abc");
        assert_eq!(timer.durations().get(SessionType::ShortBreak), 1);
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut timer = running(SessionDurations::new(1, 5, 15));
        for _ in 0..30 {
            timer.tick();
        }
        match timer.snapshot() {
            Event::SessionSnapshot {
                session_type,
                remaining,
                total_secs,
                running,
                progress_pct,
                ..
            } => {
                assert_eq!(session_type, SessionType::Work);
                assert_eq!(remaining, Clock::new(0, 30));
                assert_eq!(total_secs, 60);
                assert!(running);
                assert_eq!(progress_pct, 50.0);
            }
            other => panic!("Expected SessionSnapshot, got {other:?}"),
        }
    }
}
