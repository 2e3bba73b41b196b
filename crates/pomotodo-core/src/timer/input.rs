//! Forgiving numeric input for duration editors.
//!
//! Duration fields never reject input. Text is read the way a browser
//! number field hands it over: leading whitespace, an optional sign and
//! the leading run of digits (`"12abc"` is 12, `"2.7"` is 2). Anything
//! without digits falls back to the caller's floor.

/// Parse the leading integer of `input`, or `None` when it has no digits.
pub fn leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Clamp to `floor..=u32::MAX`.
pub fn clamp_at_least(value: i64, floor: u32) -> u32 {
    value.clamp(i64::from(floor), i64::from(u32::MAX)) as u32
}

/// Session minutes: non-numeric or non-positive input becomes 1.
pub fn session_minutes(input: &str) -> u32 {
    match leading_int(input) {
        Some(value) if value > 0 => clamp_at_least(value, 1),
        _ => 1,
    }
}

/// Countdown field: non-numeric or negative input becomes 0.
pub fn countdown_field(input: &str) -> u32 {
    leading_int(input).map_or(0, |value| clamp_at_least(value, 0))
}
