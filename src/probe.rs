// Network probe: the external speed test that yields one sample per run.
// CommandProbe shells out to a speed test CLI and parses its JSON report.

use crate::error::{Error, Result};
use crate::models::Sample;
use serde::Deserialize;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tracing::debug;

/// Anything that can produce one measurement on demand.
pub trait Probe {
    fn measure(&self) -> impl Future<Output = Result<Sample>> + Send;
}

/// Awaits one probe run, bounded by `timeout`. On expiry the run is dropped and
/// `ProbeTimeout` is returned.
pub async fn run_probe<P: Probe>(probe: &P, timeout: Duration) -> Result<Sample> {
    match tokio::time::timeout(timeout, probe.measure()).await {
        Ok(result) => result,
        Err(_) => Err(Error::ProbeTimeout(timeout)),
    }
}

/// Runs an external speed test (e.g. `speedtest-cli --json` or Ookla `speedtest -f json`).
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl CommandProbe {
    /// `command[0]` is the program, the rest its arguments.
    pub fn new(command: &[String]) -> Result<Self> {
        let Some((program, args)) = command.split_first() else {
            return Err(Error::ProbeFailure("probe command is empty".into()));
        };
        if program.trim().is_empty() {
            return Err(Error::ProbeFailure("probe program is empty".into()));
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl Probe for CommandProbe {
    async fn measure(&self) -> Result<Sample> {
        debug!(program = %self.program, args = ?self.args, "Running speed test");
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::ProbeFailure(format!("spawn {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ProbeFailure(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let reading = parse_report(&output.stdout)?;
        Ok(Sample::now(reading.upload, reading.download, reading.ping))
    }
}

/// Metrics in the units the store keeps: Mb/s and ms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    pub upload: Option<f64>,
    pub download: Option<f64>,
    pub ping: Option<f64>,
}

const BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// speedtest-cli reports bits/s; Ookla reports bytes/s nested per direction.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Report {
    SpeedtestCli {
        download: Option<f64>,
        upload: Option<f64>,
        ping: Option<f64>,
    },
    Ookla {
        download: Option<OoklaTransfer>,
        upload: Option<OoklaTransfer>,
        ping: Option<OoklaPing>,
    },
}

#[derive(Debug, Deserialize)]
struct OoklaTransfer {
    bandwidth: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OoklaPing {
    latency: Option<f64>,
}

pub fn parse_report(stdout: &[u8]) -> Result<Reading> {
    let report: Report = serde_json::from_slice(stdout)
        .map_err(|e| Error::ProbeFailure(format!("unrecognized speed test output: {e}")))?;
    let reading = match report {
        Report::SpeedtestCli {
            download,
            upload,
            ping,
        } => Reading {
            upload: upload.map(|bps| bps / BITS_PER_MEGABIT),
            download: download.map(|bps| bps / BITS_PER_MEGABIT),
            ping,
        },
        Report::Ookla {
            download,
            upload,
            ping,
        } => Reading {
            upload: upload.and_then(|t| t.bandwidth).map(bytes_to_mbps),
            download: download.and_then(|t| t.bandwidth).map(bytes_to_mbps),
            ping: ping.and_then(|p| p.latency),
        },
    };
    Ok(reading)
}

fn bytes_to_mbps(bytes_per_sec: f64) -> f64 {
    bytes_per_sec * 8.0 / BITS_PER_MEGABIT
}
