//! Interactive terminal loop shared by the `timer` and `countdown`
//! commands.
//!
//! Lines typed on stdin are parsed into [`Command`]s and applied to the
//! timer through its [`TickDriver`]; the driver's listener renders every
//! tick as a single status line.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use pomotodo_core::ticker::EventListener;
use pomotodo_core::timer::Countdown;
use pomotodo_core::{
    CompletionSignal, CountdownField, CountdownStatus, Event, FreeTimer, SessionTimer,
    SessionType, TickDriver, TokioScheduler, ValidationError,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const BAR_WIDTH: usize = 20;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Reset,
    Edit { target: String, value: String },
    Status,
    Help,
    Quit,
}

/// Parse a console line. Any other word is an edit target, resolved
/// later by the timer.
///
/// An empty line toggles, so pressing Enter works as start/pause.
pub fn parse_command(line: &str) -> Command {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Command::Toggle;
    };
    match head.to_ascii_lowercase().as_str() {
        "p" | "pause" | "start" | "toggle" => Command::Toggle,
        "r" | "reset" => Command::Reset,
        "st" | "status" => Command::Status,
        "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        target => Command::Edit {
            target: target.to_string(),
            // Missing value reads as "", which the timers clamp to the floor.
            value: words.next().unwrap_or_default().to_string(),
        },
    }
}

/// Timer operations reachable from the console.
pub trait Controls: Countdown {
    const HELP: &'static str;

    /// Start or pause. `None` when the timer refused to start.
    fn toggle(&mut self) -> Option<Event>;

    fn restart(&mut self) -> Event;

    fn edit(&mut self, target: &str, value: &str) -> Result<Event, ValidationError>;
}

impl Controls for SessionTimer {
    const HELP: &'static str = "\
Enter/p  start or pause
r        reset the current session
w N      set Work length (minutes)
s N      set Short Break length (minutes)
l N      set Long Break length (minutes)
status   print the timer state as JSON
q        quit";

    fn toggle(&mut self) -> Option<Event> {
        Some(self.start_pause())
    }

    fn restart(&mut self) -> Event {
        self.reset()
    }

    fn edit(&mut self, target: &str, value: &str) -> Result<Event, ValidationError> {
        let session: SessionType = target.parse()?;
        Ok(self.reconfigure_from_input(session, value))
    }
}

impl Controls for FreeTimer {
    const HELP: &'static str = "\
Enter/p  start or pause
r        reload the configured duration
h N      set hours
m N      set minutes
s N      set seconds
status   print the timer state as JSON
q        quit";

    fn toggle(&mut self) -> Option<Event> {
        self.start_pause()
    }

    fn restart(&mut self) -> Event {
        self.reset()
    }

    fn edit(&mut self, target: &str, value: &str) -> Result<Event, ValidationError> {
        let field: CountdownField = target.parse()?;
        Ok(self.reconfigure_from_input(field, value))
    }
}

fn progress_bar(pct: f64) -> String {
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Text for one event, or `None` when it is not shown.
pub fn render(event: &Event) -> Option<String> {
    match event {
        Event::SessionSnapshot {
            session_type,
            remaining,
            running,
            progress_pct,
            ..
        } => Some(format!(
            "{:<11} {remaining} {} {progress_pct:>5.1}% {}",
            session_type.label(),
            progress_bar(*progress_pct),
            if *running { "running" } else { "paused" },
        )),
        Event::CountdownSnapshot {
            status,
            remaining_secs,
            progress_pct,
            ..
        } => Some(format!(
            "Countdown   {} {} {progress_pct:>5.1}% {}",
            pomotodo_core::timer::format_hms(*remaining_secs),
            progress_bar(*progress_pct),
            match status {
                CountdownStatus::Idle => "paused",
                CountdownStatus::Running => "running",
                CountdownStatus::Expired => "expired",
            },
        )),
        Event::SessionCompleted {
            completed, next, ..
        } => Some(format!("{} finished. Time for: {}", completed.label(), next.label())),
        Event::CountdownExpired { .. } => Some("Countdown finished".to_string()),
        _ => None,
    }
}

fn draw(event: &Event) {
    let Some(line) = render(event) else { return };
    let mut out = std::io::stdout().lock();
    let written = if event.is_completion() {
        writeln!(out, "\r\x1b[2K{line}")
    } else {
        write!(out, "\r\x1b[2K{line}")
    };
    if let Err(e) = written.and_then(|()| out.flush()) {
        tracing::debug!(error = %e, "failed to draw status line");
    }
}

fn say(message: impl std::fmt::Display) {
    println!("\r\x1b[2K{message}");
}

/// Drive `timer` from stdin until `q`, end of input or Ctrl-C.
///
/// # Errors
/// Returns an error if reading stdin fails.
pub async fn run<T: Controls>(
    timer: T,
    signal: CompletionSignal,
    autostart: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener: EventListener = Arc::new(draw);
    let mut driver = TickDriver::new(timer, TokioScheduler::new(), signal).with_listener(listener);

    say(T::HELP);
    if autostart && driver.update(|t| t.toggle()).is_none() {
        say("nothing to count down; set a duration first");
    }
    draw(&driver.with(|t| t.snapshot()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Toggle => {
                        if let Some(event) = driver.update(|t| t.toggle()) {
                            tracing::debug!(?event, "toggled");
                        } else {
                            say("countdown is at zero; reset or edit it first");
                        }
                    }
                    Command::Reset => {
                        let event = driver.update(|t| t.restart());
                        tracing::debug!(?event, "reset");
                    }
                    Command::Edit { target, value } => {
                        match driver.update(|t| t.edit(&target, &value)) {
                            Ok(event) => tracing::debug!(?event, "reconfigured"),
                            Err(e) => say(format!("{e} (? for help)")),
                        }
                    }
                    Command::Help => say(T::HELP),
                    Command::Status => {
                        let snapshot = driver.with(|t| t.snapshot());
                        say(serde_json::to_string(&snapshot)?);
                    }
                }
                draw(&driver.with(|t| t.snapshot()));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    println!();
    Ok(())
}

/// Run [`run`] on a dedicated runtime.
///
/// Stdin reads block a runtime thread, so the runtime is shut down with a
/// timeout instead of waiting for a read that may never finish.
///
/// # Errors
/// Returns an error if the runtime cannot be built or the loop fails.
pub fn block_on<T: Controls>(
    timer: T,
    signal: CompletionSignal,
    autostart: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(timer, signal, autostart));
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}
