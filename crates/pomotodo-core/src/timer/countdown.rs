//! Free-form countdown configured in hours, minutes and seconds.
//!
//! Unlike [`SessionTimer`](super::SessionTimer) it does not rotate: once it
//! reaches zero it stops and stays expired until it is reset or edited.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::format_hms;
use super::input;
use super::Countdown;
use crate::error::ValidationError;
use crate::events::{Event, TimerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownStatus {
    Idle,
    Running,
    /// Zero seconds left and not running.
    Expired,
}

/// Editable unit of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownField {
    Hours,
    Minutes,
    Seconds,
}

impl fmt::Display for CountdownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CountdownField::Hours => "hours",
            CountdownField::Minutes => "minutes",
            CountdownField::Seconds => "seconds",
        })
    }
}

impl FromStr for CountdownField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "hour" | "hours" => Ok(CountdownField::Hours),
            "m" | "min" | "minute" | "minutes" => Ok(CountdownField::Minutes),
            "s" | "sec" | "second" | "seconds" => Ok(CountdownField::Seconds),
            _ => Err(ValidationError::UnknownCountdownField(s.to_string())),
        }
    }
}

/// The user's h/m/s entry. Fields are independent and not normalised,
/// so `{0h, 90m, 0s}` is a valid ninety-minute countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSpec {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl CountdownSpec {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    fn set(&mut self, field: CountdownField, value: u32) {
        match field {
            CountdownField::Hours => self.hours = value,
            CountdownField::Minutes => self.minutes = value,
            CountdownField::Seconds => self.seconds = value,
        }
    }
}

/// Single countdown with no rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeTimer {
    configured: CountdownSpec,
    total_seconds: u64,
    remaining_seconds: u64,
    running: bool,
}

impl FreeTimer {
    /// Create an idle countdown loaded from `configured`.
    pub fn new(configured: CountdownSpec) -> Self {
        let total_seconds = configured.total_seconds();
        Self {
            configured,
            total_seconds,
            remaining_seconds: total_seconds,
            running: false,
        }
    }

    pub fn configured(&self) -> CountdownSpec {
        self.configured
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> CountdownStatus {
        if self.running {
            CountdownStatus::Running
        } else if self.remaining_seconds == 0 {
            CountdownStatus::Expired
        } else {
            CountdownStatus::Idle
        }
    }

    /// 0.0 .. 100.0; zero when the countdown has no length at all.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.total_seconds.saturating_sub(self.remaining_seconds);
        (elapsed as f64 / self.total_seconds as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Remaining time as `HH:MM:SS`.
    pub fn format_remaining(&self) -> String {
        format_hms(self.remaining_seconds)
    }

    pub fn snapshot(&self) -> Event {
        Event::CountdownSnapshot {
            status: self.status(),
            remaining_secs: self.remaining_seconds,
            total_secs: self.total_seconds,
            progress_pct: self.progress(),
            at: Utc::now(),
        }
    }

    /// Toggle running. An expired countdown cannot be started; this returns
    /// `None` and leaves the state untouched.
    pub fn start_pause(&mut self) -> Option<Event> {
        if self.remaining_seconds == 0 {
            return None;
        }
        self.running = !self.running;
        let at = Utc::now();
        let remaining_secs = self.remaining_seconds;
        Some(if self.running {
            Event::TimerStarted {
                timer: TimerKind::Countdown,
                remaining_secs,
                at,
            }
        } else {
            Event::TimerPaused {
                timer: TimerKind::Countdown,
                remaining_secs,
                at,
            }
        })
    }

    /// Reload from the configured h/m/s and stop.
    pub fn reset(&mut self) -> Event {
        self.reload();
        Event::TimerReset {
            timer: TimerKind::Countdown,
            remaining_secs: self.remaining_seconds,
            at: Utc::now(),
        }
    }

    /// Set one field (negative values clamp to zero), then reload and stop.
    /// Editing a running countdown silently stops it.
    pub fn reconfigure(&mut self, field: CountdownField, value: i64) -> Event {
        let value = input::clamp_at_least(value, 0);
        self.configured.set(field, value);
        self.reload();
        tracing::debug!(%field, value, total = self.total_seconds, "countdown configured");
        Event::CountdownConfigured {
            field,
            value,
            total_secs: self.total_seconds,
            at: Utc::now(),
        }
    }

    /// Same as [`reconfigure`](Self::reconfigure) for raw editor text.
    pub fn reconfigure_from_input(&mut self, field: CountdownField, raw: &str) -> Event {
        self.reconfigure(field, i64::from(input::countdown_field(raw)))
    }

    /// Advance one second. The tick that brings the countdown to zero stops
    /// it and returns `Some(Event::CountdownExpired)`; ticks on a stopped
    /// countdown do nothing.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            if self.remaining_seconds > 0 {
                return None;
            }
        }

        self.running = false;
        tracing::info!(total = self.total_seconds, "countdown expired");
        Some(Event::CountdownExpired {
            total_secs: self.total_seconds,
            at: Utc::now(),
        })
    }

    fn reload(&mut self) {
        self.total_seconds = self.configured.total_seconds();
        self.remaining_seconds = self.total_seconds;
        self.running = false;
    }
}

impl Default for FreeTimer {
    fn default() -> Self {
        Self::new(CountdownSpec::new(0, 25, 0))
    }
}

impl Countdown for FreeTimer {
    fn tick(&mut self) -> Option<Event> {
        FreeTimer::tick(self)
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn snapshot(&self) -> Event {
        FreeTimer::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_loads_configured_total() {
        let timer = FreeTimer::new(CountdownSpec::new(1, 2, 3));
        assert_eq!(timer.total_seconds(), 3723);
        assert_eq!(timer.remaining_seconds(), 3723);
        assert_eq!(timer.status(), CountdownStatus::Idle);
        assert_eq!(timer.format_remaining(), "01:02:03");
    }

    #[test]
    fn start_pause_at_zero_is_noop() {
        let mut timer = FreeTimer::new(CountdownSpec::default());
        let before = timer.clone();
        assert!(timer.start_pause().is_none());
        assert_eq!(timer, before);
        assert_eq!(timer.status(), CountdownStatus::Expired);
    }

    #[test]
    fn reaching_zero_stops_and_expires_once() {
        let mut timer = FreeTimer::new(CountdownSpec::new(0, 0, 2));
        timer.start_pause();
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_seconds(), 1);
        assert!(timer.tick().unwrap().is_completion());
        assert_eq!(timer.remaining_seconds(), 0);
        assert!(!timer.is_running());
        assert!(timer.tick().is_none());
        assert_eq!(timer.status(), CountdownStatus::Expired);
    }

    #[test]
    fn running_zero_length_countdown_expires_on_next_tick() {
        // Reachable only by hand-built state; the tick still terminates it.
        let mut timer = FreeTimer {
            configured: CountdownSpec::default(),
            total_seconds: 0,
            remaining_seconds: 0,
            running: true,
        };
        assert!(timer.tick().unwrap().is_completion());
        assert!(!timer.is_running());
    }

    #[test]
    fn reconfigure_stops_running_countdown() {
        let mut timer = FreeTimer::new(CountdownSpec::new(0, 1, 0));
        timer.start_pause();
        timer.tick();
        timer.reconfigure(CountdownField::Seconds, 30);
        assert!(!timer.is_running());
        assert_eq!(timer.total_seconds(), 90);
        assert_eq!(timer.remaining_seconds(), 90);
    }

    #[test]
    fn reconfigure_clamps_negative_to_zero() {
        let mut timer = FreeTimer::new(CountdownSpec::new(0, 1, 0));
        timer.reconfigure(CountdownField::Minutes, -5);
        assert_eq!(timer.configured().minutes, 0);
        assert_eq!(timer.total_seconds(), 0);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn reset_restores_configured_time() {
        let mut timer = FreeTimer::new(CountdownSpec::new(0, 0, 10));
        timer.start_pause();
        timer.tick();
        timer.tick();
        timer.reset();
        assert_eq!(timer.remaining_seconds(), 10);
        assert!(!timer.is_running());
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("h".parse::<CountdownField>().unwrap(), CountdownField::Hours);
        assert_eq!(
            "Minutes".parse::<CountdownField>().unwrap(),
            CountdownField::Minutes
        );
        assert!("days".parse::<CountdownField>().is_err());
    }
}
