use anyhow::{Context, Result};
use clap::Parser;
use speedlog::cli::{Cli, Command};
use speedlog::config::AppConfig;
use speedlog::models::Sample;
use speedlog::probe::CommandProbe;
use speedlog::store::MeasurementStore;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries chart/stats output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut app_config = AppConfig::load()?;
    if let Some(path) = cli.database {
        app_config.database.path = path;
    }

    let store = MeasurementStore::open_with(
        &app_config.database.path,
        app_config.database.busy_timeout(),
    )
    .with_context(|| format!("opening {}", app_config.database.path))?;

    let result = run(
        &store,
        &app_config,
        cli.command.unwrap_or(Command::Measure),
    )
    .await;
    store.close().await;
    result
}

async fn run(store: &MeasurementStore, config: &AppConfig, command: Command) -> Result<()> {
    match command {
        Command::Measure => {
            let probe = CommandProbe::new(&config.probe.command)?;
            tracing::info!("Starting measurement");
            let sample = store
                .measure(&probe, config.probe.timeout())
                .await
                .context("measurement failed")?;
            print_sample(&sample);
        }
        Command::Stats(args) => {
            let window = args.window()?;
            let stats = store.stats(&window).await?;
            if stats.is_empty() {
                println!("No measurements in the selected window");
            } else {
                print!("{stats}");
            }
        }
        Command::Chart(args) => {
            let samples = store.query(&args.window()?).await?;
            println!("{}", serde_json::to_string_pretty(&samples)?);
        }
        Command::Dump { file, window } => {
            let csv = store.dump(&window.window()?).await?;
            tokio::fs::write(&file, csv)
                .await
                .with_context(|| format!("writing {}", file.display()))?;
            tracing::info!(path = %file.display(), "Dump written");
        }
        Command::Clear => {
            let removed = store.clear_all().await?;
            tracing::info!(removed, "Measurements cleared");
        }
    }
    Ok(())
}

fn print_sample(sample: &Sample) {
    println!("Measurement results ({}):", sample.time_string());
    println!("\tupload: {} Mb/s", display_metric(sample.upload));
    println!("\tdownload: {} Mb/s", display_metric(sample.download));
    println!("\tping: {} ms", display_metric(sample.ping));
}

fn display_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".into(), |v| format!("{v:.2}"))
}
