// Aggregates over a window of samples: avg/max per metric, non-null values only.

use serde::Serialize;
use std::fmt;

/// Average and maximum of one metric. Both are `None` when no sample had a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    pub average: Option<f64>,
    pub max: Option<f64>,
    /// Number of non-null values the summary was computed from.
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Samples in the window, including ones where every metric is null.
    pub samples: usize,
    pub upload: MetricSummary,
    pub download: MetricSummary,
    pub ping: MetricSummary,
}

impl AggregateResult {
    /// No samples in the window. Not an error.
    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }
}

impl fmt::Display for AggregateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "samples: {}", self.samples)?;
        write_metric(f, "upload", &self.upload, "Mb/s")?;
        write_metric(f, "download", &self.download, "Mb/s")?;
        write_metric(f, "ping", &self.ping, "ms")
    }
}

fn write_metric(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    m: &MetricSummary,
    unit: &str,
) -> fmt::Result {
    match (m.average, m.max) {
        (Some(avg), Some(max)) => {
            writeln!(f, "{name}: avg {avg:.2} {unit}, max {max:.2} {unit}")
        }
        _ => writeln!(f, "{name}: no data"),
    }
}
