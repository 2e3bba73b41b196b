//! End-to-end behaviour of the free-form countdown.

use pomotodo_core::{CountdownField, CountdownSpec, CountdownStatus, Event, FreeTimer};

#[test]
fn three_second_countdown() {
    let mut timer = FreeTimer::default();
    timer.reconfigure(CountdownField::Minutes, 0);
    timer.reconfigure(CountdownField::Seconds, 3);
    timer.reset();
    assert_eq!(timer.remaining_seconds(), 3);
    assert_eq!(timer.progress(), 0.0);

    assert!(timer.start_pause().is_some());

    let mut completions = 0;
    let mut seen = Vec::new();
    for _ in 0..3 {
        if let Some(event) = timer.tick() {
            assert!(matches!(
                event,
                Event::CountdownExpired { total_secs: 3, .. }
            ));
            completions += 1;
        }
        seen.push(timer.remaining_seconds());
    }
    assert_eq!(seen, vec![2, 1, 0]);
    assert_eq!(completions, 1);
    assert!(!timer.is_running());
    assert_eq!(timer.progress(), 100.0);
    assert_eq!(timer.status(), CountdownStatus::Expired);

    let before = timer.clone();
    assert!(timer.tick().is_none());
    assert_eq!(timer, before);
}

#[test]
fn expired_countdown_cannot_be_restarted_without_reset() {
    let mut timer = FreeTimer::new(CountdownSpec::new(0, 0, 1));
    timer.start_pause();
    timer.tick();
    let before = timer.clone();
    assert!(timer.start_pause().is_none());
    assert_eq!(timer, before);

    timer.reset();
    assert!(timer.start_pause().is_some());
    assert!(timer.is_running());
}

#[test]
fn zero_length_countdown_has_zero_progress() {
    let timer = FreeTimer::new(CountdownSpec::default());
    assert_eq!(timer.total_seconds(), 0);
    assert_eq!(timer.progress(), 0.0);
}

#[test]
fn editing_any_field_stops_and_reloads() {
    let mut timer = FreeTimer::new(CountdownSpec::new(1, 0, 0));
    timer.start_pause();
    for _ in 0..10 {
        timer.tick();
    }
    timer.reconfigure_from_input(CountdownField::Hours, "abc");
    assert!(!timer.is_running());
    assert_eq!(timer.configured(), CountdownSpec::new(0, 0, 0));
    assert_eq!(timer.remaining_seconds(), 0);

    timer.reconfigure_from_input(CountdownField::Minutes, "2");
    assert_eq!(timer.total_seconds(), 120);
    assert_eq!(timer.remaining_seconds(), 120);
    assert_eq!(timer.format_remaining(), "00:02:00");
}

#[test]
fn pause_keeps_remaining_time() {
    let mut timer = FreeTimer::new(CountdownSpec::new(0, 0, 10));
    timer.start_pause();
    timer.tick();
    timer.start_pause();
    assert!(timer.tick().is_none());
    assert_eq!(timer.remaining_seconds(), 9);
    assert_eq!(timer.status(), CountdownStatus::Idle);
}
