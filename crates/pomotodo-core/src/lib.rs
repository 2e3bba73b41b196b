//! # Pomotodo Core Library
//!
//! Core logic for Pomotodo: a Pomodoro session timer, a free-form
//! countdown and a to-do list. The CLI binary is a thin layer over the same
//! library.
//!
//! ## Architecture
//!
//! - **Timers**: tick-driven state machines with no thread of their own
//! - **Ticker**: periodic scheduling that binds a timer to one tick
//!   subscription at a time
//! - **Signal**: notification + audio cue fired when a countdown ends
//! - **Storage**: SQLite record store for to-dos and TOML configuration
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: rotating Work / Short Break / Long Break countdown
//! - [`FreeTimer`]: single h/m/s countdown
//! - [`TickDriver`]: owns a timer and its tick subscription
//! - [`CompletionSignal`]: completion side effects behind capability traits
//! - [`TodoList`]: to-do records over a [`RecordStore`]
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod signal;
pub mod storage;
pub mod ticker;
pub mod timer;
pub mod todo;

pub use error::{ConfigError, CoreError, SignalError, StoreError, ValidationError};
pub use events::{Completion, Event, TimerKind};
pub use signal::{AudioCue, CompletionSignal, Notifier, Permission};
pub use storage::{Config, Database};
pub use ticker::{ManualScheduler, Scheduler, TickDriver, TokioScheduler};
pub use timer::{
    Clock, Countdown, CountdownField, CountdownSpec, CountdownStatus, FreeTimer,
    SessionDurations, SessionTimer, SessionType,
};
pub use todo::{MemoryStore, RecordStore, Todo, TodoList};
