use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::input;
use crate::error::ValidationError;

/// Kind of Pomodoro session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::Work,
        SessionType::ShortBreak,
        SessionType::LongBreak,
    ];

    /// Rotation table. Each completed session hands over to exactly one
    /// successor, and the cycle has no terminal entry.
    pub const fn next(self) -> SessionType {
        match self {
            SessionType::Work => SessionType::ShortBreak,
            SessionType::ShortBreak => SessionType::LongBreak,
            SessionType::LongBreak => SessionType::Work,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SessionType::Work => "Work",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "work" | "w" => Ok(SessionType::Work),
            "short-break" | "short" | "s" => Ok(SessionType::ShortBreak),
            "long-break" | "long" | "l" => Ok(SessionType::LongBreak),
            _ => Err(ValidationError::UnknownSessionType(s.to_string())),
        }
    }
}

/// Lowest duration a session may be configured to, in minutes.
pub const MIN_SESSION_MINUTES: u32 = 1;

/// Configured length of each session type, in whole minutes.
///
/// Every entry is at least [`MIN_SESSION_MINUTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDurations")]
pub struct SessionDurations {
    work: u32,
    short_break: u32,
    long_break: u32,
}

/// Wire form of [`SessionDurations`]; clamped on the way in.
#[derive(Deserialize)]
struct RawDurations {
    work: u32,
    short_break: u32,
    long_break: u32,
}

impl From<RawDurations> for SessionDurations {
    fn from(raw: RawDurations) -> Self {
        Self::new(raw.work, raw.short_break, raw.long_break)
    }
}

impl SessionDurations {
    /// Build from raw minute counts, clamping each to at least one minute.
    pub fn new(work: u32, short_break: u32, long_break: u32) -> Self {
        Self {
            work: work.max(MIN_SESSION_MINUTES),
            short_break: short_break.max(MIN_SESSION_MINUTES),
            long_break: long_break.max(MIN_SESSION_MINUTES),
        }
    }

    pub fn get(&self, session: SessionType) -> u32 {
        match session {
            SessionType::Work => self.work,
            SessionType::ShortBreak => self.short_break,
            SessionType::LongBreak => self.long_break,
        }
    }

    /// Store `minutes` for `session`, clamped to at least one minute.
    /// Returns the value actually stored.
    pub fn set(&mut self, session: SessionType, minutes: i64) -> u32 {
        let minutes = input::clamp_at_least(minutes, MIN_SESSION_MINUTES);
        let slot = match session {
            SessionType::Work => &mut self.work,
            SessionType::ShortBreak => &mut self.short_break,
            SessionType::LongBreak => &mut self.long_break,
        };
        *slot = minutes;
        minutes
    }
}

impl Default for SessionDurations {
    fn default() -> Self {
        Self {
            work: 25,
            short_break: 5,
            long_break: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializing_clamps_zero_minutes() {
        let durations: SessionDurations =
            serde_json::from_str(r#"{"work":0,"short_break":0,"long_break":7}"#).unwrap();
        assert_eq!(durations, SessionDurations::new(1, 1, 7));
        for session in SessionType::ALL {
            assert!(durations.get(session) >= MIN_SESSION_MINUTES);
        }
    }

    #[test]
    fn rotation_cycles_through_all_types() {
        assert_eq!(SessionType::Work.next(), SessionType::ShortBreak);
        assert_eq!(SessionType::ShortBreak.next(), SessionType::LongBreak);
        assert_eq!(SessionType::LongBreak.next(), SessionType::Work);
    }

    #[test]
    fn rotation_returns_home_after_three_steps() {
        for session in SessionType::ALL {
            assert_eq!(session.next().next().next(), session);
        }
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!("Work".parse::<SessionType>().unwrap(), SessionType::Work);
        assert_eq!(
            "short_break".parse::<SessionType>().unwrap(),
            SessionType::ShortBreak
        );
        assert_eq!(
            "Long Break".parse::<SessionType>().unwrap(),
            SessionType::LongBreak
        );
        assert!("lunch".parse::<SessionType>().is_err());
    }

    #[test]
    fn default_durations() {
        let d = SessionDurations::default();
        assert_eq!(d.get(SessionType::Work), 25);
        assert_eq!(d.get(SessionType::ShortBreak), 5);
        assert_eq!(d.get(SessionType::LongBreak), 15);
    }

    #[test]
    fn set_clamps_to_one_minute() {
        let mut d = SessionDurations::default();
        assert_eq!(d.set(SessionType::Work, 0), 1);
        assert_eq!(d.set(SessionType::LongBreak, -7), 1);
        assert_eq!(d.get(SessionType::Work), 1);
        assert_eq!(d.get(SessionType::LongBreak), 1);
    }

    #[test]
    fn new_clamps_zero_entries() {
        let d = SessionDurations::new(0, 3, 0);
        assert_eq!(d, SessionDurations::new(1, 3, 1));
    }
}
