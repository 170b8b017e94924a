// Domain models: one stored measurement, and per-metric aggregates over a set of them.

mod aggregate;
mod sample;

pub use aggregate::{AggregateResult, MetricSummary};
pub use sample::{Sample, format_timestamp, parse_timestamp};
