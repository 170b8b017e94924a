use crate::error::Result;
use crate::window::{Period, Window, resolve};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Record speed test measurements and report on their history.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database path (overrides database.path from the config file)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Defaults to `measure`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Make a new speed test measurement
    Measure,
    /// Display average and maximum upload, download and ping
    Stats(WindowArgs),
    /// Print measurements as JSON for a chart renderer
    Chart(WindowArgs),
    /// Write measurements to a CSV file
    Dump {
        file: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Clear all previous measurements
    Clear,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct WindowArgs {
    /// Only the last day, week (7 days) or month (30 days)
    #[arg(long, value_enum, conflicts_with_all = ["since", "until"])]
    pub last: Option<Period>,

    /// Only measurements at or after this RFC 3339 time
    #[arg(long)]
    pub since: Option<DateTime<Utc>>,

    /// Only measurements at or before this RFC 3339 time
    #[arg(long)]
    pub until: Option<DateTime<Utc>>,
}

impl WindowArgs {
    /// `--last` resolves against now; otherwise `--since`/`--until` (each optional).
    pub fn window(&self) -> Result<Window> {
        match self.last {
            Some(period) => Ok(resolve(Some(period))),
            None => Window::between(self.since, self.until),
        }
    }
}
