use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Clock, CountdownField, CountdownStatus, SessionType};

/// Title used for every completion notification.
pub const NOTIFICATION_TITLE: &str = "Pomodoro Timer";

/// Which of the two independent timers produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Session,
    Countdown,
}

/// Every state change of a timer produces an Event.
/// The CLI renders them; completions drive the completion signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        timer: TimerKind,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        timer: TimerKind,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        timer: TimerKind,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A session duration was edited. `stopped` is set when the edit hit
    /// the active session and invalidated its countdown.
    SessionDurationChanged {
        session_type: SessionType,
        minutes: u32,
        stopped: bool,
        at: DateTime<Utc>,
    },
    /// A countdown field was edited; the countdown is reloaded and stopped.
    CountdownConfigured {
        field: CountdownField,
        value: u32,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// A session ran out and the timer rotated into the next one.
    SessionCompleted {
        completed: SessionType,
        next: SessionType,
        at: DateTime<Utc>,
    },
    /// The free-form countdown reached zero and stopped.
    CountdownExpired { total_secs: u64, at: DateTime<Utc> },
    SessionSnapshot {
        session_type: SessionType,
        remaining: Clock,
        total_secs: u64,
        running: bool,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    CountdownSnapshot {
        status: CountdownStatus,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

/// Payload handed to the notifier when a countdown reaches zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub title: String,
    pub body: String,
}

impl Event {
    /// The notification this event should raise, if it marks a completion.
    pub fn completion(&self) -> Option<Completion> {
        let body = match self {
            Event::SessionCompleted { next, .. } => format!("Time for: {next}"),
            Event::CountdownExpired { .. } => "Countdown finished".to_string(),
            _ => return None,
        };
        Some(Completion {
            title: NOTIFICATION_TITLE.to_string(),
            body,
        })
    }

    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Event::SessionCompleted { .. } | Event::CountdownExpired { .. }
        )
    }
}
