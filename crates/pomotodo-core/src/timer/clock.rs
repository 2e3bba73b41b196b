use std::fmt;

use serde::{Deserialize, Serialize};

/// Minutes and seconds left on a session countdown.
///
/// `seconds` is always in `0..=59`; the derived ordering relies on it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Clock {
    minutes: u32,
    seconds: u8,
}

impl Clock {
    pub const ZERO: Clock = Clock {
        minutes: 0,
        seconds: 0,
    };

    /// Build a clock, carrying whole minutes out of `seconds`.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes.saturating_add(seconds / 60),
            seconds: (seconds % 60) as u8,
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes, seconds: 0 }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }

    /// One second less, borrowing a minute when the seconds run out.
    /// Saturates at `00:00`.
    pub fn decrement(self) -> Self {
        match (self.minutes, self.seconds) {
            (0, 0) => self,
            (m, 0) => Self {
                minutes: m - 1,
                seconds: 59,
            },
            (m, s) => Self {
                minutes: m,
                seconds: s - 1,
            },
        }
    }
}

impl fmt::Display for Clock {
    /// Zero-padded `MM:SS`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Format a second count as `HH:MM:SS`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decrement_borrows_a_minute() {
        assert_eq!(Clock::from_minutes(5).decrement(), Clock::new(4, 59));
        assert_eq!(Clock::new(4, 59).decrement(), Clock::new(4, 58));
    }

    #[test]
    fn decrement_saturates_at_zero() {
        assert_eq!(Clock::ZERO.decrement(), Clock::ZERO);
        assert_eq!(Clock::new(0, 1).decrement(), Clock::ZERO);
    }

    #[test]
    fn new_carries_overflowing_seconds() {
        let clock = Clock::new(1, 125);
        assert_eq!(clock.minutes(), 3);
        assert_eq!(clock.seconds(), 5);
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(Clock::from_minutes(25).to_string(), "25:00");
        assert_eq!(Clock::new(4, 7).to_string(), "04:07");
        assert_eq!(Clock::from_minutes(125).to_string(), "125:00");
    }

    #[test]
    fn hms_format() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3 * 3600 + 2 * 60 + 1), "03:02:01");
    }

    proptest! {
        #[test]
        fn decrement_removes_exactly_one_second(minutes in 0u32..10_000, seconds in 0u32..60) {
            let clock = Clock::new(minutes, seconds);
            prop_assume!(!clock.is_zero());
            let next = clock.decrement();
            prop_assert_eq!(next.total_seconds() + 1, clock.total_seconds());
            prop_assert!(next.seconds() < 60);
            prop_assert!(next < clock);
        }
    }
}
