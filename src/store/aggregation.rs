// Pure aggregation over a window of samples. DB access stays in store::mod.

use crate::models::{AggregateResult, MetricSummary, Sample};

/// Average and maximum per metric over the non-null values of `samples`.
/// Input order does not matter beyond floating-point rounding of the sum.
pub fn aggregate(samples: &[Sample]) -> AggregateResult {
    AggregateResult {
        samples: samples.len(),
        upload: summarize(&metric_values(samples, |s| s.upload)),
        download: summarize(&metric_values(samples, |s| s.download)),
        ping: summarize(&metric_values(samples, |s| s.ping)),
    }
}

fn metric_values(samples: &[Sample], metric: impl Fn(&Sample) -> Option<f64>) -> Vec<f64> {
    samples.iter().filter_map(metric).collect()
}

fn summarize(values: &[f64]) -> MetricSummary {
    if values.is_empty() {
        return MetricSummary::default();
    }
    MetricSummary {
        average: Some(mean_f64(values)),
        max: Some(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        count: values.len(),
    }
}

fn mean_f64(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / (v.len() as f64)
}
