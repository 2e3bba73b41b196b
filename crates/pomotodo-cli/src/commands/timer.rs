//! Pomodoro session timer commands.

use clap::Subcommand;
use pomotodo_core::{Config, SessionDurations, SessionTimer};

use crate::console;
use crate::signal;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the rotating Work / Short Break / Long Break timer interactively
    Run {
        /// Work length in minutes (overrides config)
        #[arg(long)]
        work: Option<u32>,
        /// Short Break length in minutes (overrides config)
        #[arg(long)]
        short_break: Option<u32>,
        /// Long Break length in minutes (overrides config)
        #[arg(long)]
        long_break: Option<u32>,
        /// Start counting immediately
        #[arg(long)]
        start: bool,
    },
    /// Print the initial timer state as JSON
    Status,
}

fn durations(
    config: &Config,
    work: Option<u32>,
    short_break: Option<u32>,
    long_break: Option<u32>,
) -> SessionDurations {
    let base = &config.timer;
    SessionDurations::new(
        work.unwrap_or(base.work),
        short_break.unwrap_or(base.short_break),
        long_break.unwrap_or(base.long_break),
    )
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match action {
        TimerAction::Run {
            work,
            short_break,
            long_break,
            start,
        } => {
            let timer = SessionTimer::new(durations(&config, work, short_break, long_break));
            tracing::info!(durations = ?timer.durations(), "session timer ready");
            console::block_on(timer, signal::from_config(&config), start)?;
        }
        TimerAction::Status => {
            let timer = SessionTimer::new(config.durations());
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomotodo_core::SessionType;

    #[test]
    fn flags_override_config_and_clamp() {
        let config = Config::default();
        let d = durations(&config, Some(50), None, Some(0));
        assert_eq!(d.get(SessionType::Work), 50);
        assert_eq!(d.get(SessionType::ShortBreak), 5);
        assert_eq!(d.get(SessionType::LongBreak), 1);
    }
}
