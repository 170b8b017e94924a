// CLI parsing tests: default command, window flags, strict period keywords

use chrono::{Duration, TimeZone, Utc};
use clap::Parser;
use speedlog::Error;
use speedlog::cli::{Cli, Command, WindowArgs};
use speedlog::window::Period;
use std::path::PathBuf;

#[test]
fn no_subcommand_defaults_to_measure() {
    let cli = Cli::try_parse_from(["speedlog"]).unwrap();
    assert_eq!(cli.command, None);
    assert_eq!(cli.database, None);
}

#[test]
fn stats_with_last_week() {
    let cli = Cli::try_parse_from(["speedlog", "stats", "--last", "week"]).unwrap();
    let Some(Command::Stats(args)) = cli.command else {
        panic!("expected stats");
    };
    assert_eq!(args.last, Some(Period::Week));
    let w = args.window().unwrap();
    assert_eq!(w.end.unwrap() - w.start.unwrap(), Duration::days(7));
}

#[test]
fn stats_without_flags_is_unbounded() {
    let cli = Cli::try_parse_from(["speedlog", "stats"]).unwrap();
    let Some(Command::Stats(args)) = cli.command else {
        panic!("expected stats");
    };
    assert_eq!(args, WindowArgs::default());
    assert!(args.window().unwrap().is_unbounded());
}

#[test]
fn unknown_period_is_rejected() {
    assert!(Cli::try_parse_from(["speedlog", "chart", "--last", "year"]).is_err());
}

#[test]
fn last_conflicts_with_explicit_range() {
    let res = Cli::try_parse_from([
        "speedlog",
        "stats",
        "--last",
        "day",
        "--since",
        "2024-01-01T00:00:00Z",
    ]);
    assert!(res.is_err());
}

#[test]
fn dump_with_explicit_range() {
    let cli = Cli::try_parse_from([
        "speedlog",
        "--database",
        "other.db",
        "dump",
        "out.csv",
        "--since",
        "2024-01-01T00:00:00Z",
        "--until",
        "2024-01-02T00:00:00Z",
    ])
    .unwrap();
    assert_eq!(cli.database.as_deref(), Some("other.db"));
    let Some(Command::Dump { file, window }) = cli.command else {
        panic!("expected dump");
    };
    assert_eq!(file, PathBuf::from("out.csv"));
    let w = window.window().unwrap();
    assert_eq!(w.start, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
    assert_eq!(w.end, Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()));
}

#[test]
fn inverted_range_fails_when_resolved() {
    let cli = Cli::try_parse_from([
        "speedlog",
        "chart",
        "--since",
        "2024-01-02T00:00:00Z",
        "--until",
        "2024-01-01T00:00:00Z",
    ])
    .unwrap();
    let Some(Command::Chart(args)) = cli.command else {
        panic!("expected chart");
    };
    assert!(matches!(args.window(), Err(Error::InvalidWindow { .. })));
}

#[test]
fn clear_and_measure_subcommands() {
    let cli = Cli::try_parse_from(["speedlog", "clear"]).unwrap();
    assert_eq!(cli.command, Some(Command::Clear));
    let cli = Cli::try_parse_from(["speedlog", "measure", "--database", "x.db"]).unwrap();
    assert_eq!(cli.command, Some(Command::Measure));
    assert_eq!(cli.database.as_deref(), Some("x.db"));
}
