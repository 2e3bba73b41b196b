mod clock;
mod countdown;
mod engine;
pub mod input;
mod session;

pub use clock::{format_hms, Clock};
pub use countdown::{CountdownField, CountdownSpec, CountdownStatus, FreeTimer};
pub use engine::SessionTimer;
pub use session::{SessionDurations, SessionType, MIN_SESSION_MINUTES};

use crate::events::Event;

/// A countdown that can be driven by a periodic tick source.
///
/// Implementations must make `tick` a no-op while `is_running` is false.
pub trait Countdown: Send + 'static {
    /// Advance one second. Returns the completion event when the countdown
    /// reaches the end of its current run.
    fn tick(&mut self) -> Option<Event>;

    fn is_running(&self) -> bool;

    /// Current state as a snapshot event.
    fn snapshot(&self) -> Event;
}
