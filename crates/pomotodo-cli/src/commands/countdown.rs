//! Free-form countdown commands.

use clap::Subcommand;
use pomotodo_core::{Config, CountdownSpec, FreeTimer};

use crate::console;
use crate::signal;

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Run a one-shot countdown interactively
    Run {
        /// Hours (overrides config)
        #[arg(long)]
        hours: Option<u32>,
        /// Minutes (overrides config)
        #[arg(long)]
        minutes: Option<u32>,
        /// Seconds (overrides config)
        #[arg(long)]
        seconds: Option<u32>,
        /// Start counting immediately
        #[arg(long)]
        start: bool,
    },
    /// Print the initial countdown state as JSON
    Status,
}

fn spec(
    config: &Config,
    hours: Option<u32>,
    minutes: Option<u32>,
    seconds: Option<u32>,
) -> CountdownSpec {
    let base = config.countdown_spec();
    CountdownSpec::new(
        hours.unwrap_or(base.hours),
        minutes.unwrap_or(base.minutes),
        seconds.unwrap_or(base.seconds),
    )
}

pub fn run(action: CountdownAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match action {
        CountdownAction::Run {
            hours,
            minutes,
            seconds,
            start,
        } => {
            let timer = FreeTimer::new(spec(&config, hours, minutes, seconds));
            tracing::info!(total_secs = timer.total_seconds(), "countdown ready");
            console::block_on(timer, signal::from_config(&config), start)?;
        }
        CountdownAction::Status => {
            let timer = FreeTimer::new(config.countdown_spec());
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
        }
    }
    Ok(())
}
