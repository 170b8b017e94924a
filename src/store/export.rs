// CSV export. One line per sample in the order given; null metrics are empty fields.

use crate::error::Result;
use crate::models::Sample;
use csv::{Terminator, WriterBuilder};
use std::io;

pub const CSV_HEADER: [&str; 4] = ["time", "ping", "download", "upload"];

/// Header line plus one line per sample. No samples gives just the header.
pub fn export_csv(samples: &[Sample]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(samples, &mut buf).map_err(io::Error::from)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Streams the same CSV as [`export_csv`] into `out`.
pub fn write_csv<W: io::Write>(samples: &[Sample], out: W) -> csv::Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for s in samples {
        writer.write_record([
            s.time_string(),
            metric_field(s.ping),
            metric_field(s.download),
            metric_field(s.upload),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Shortest round-trip form (`50.0` -> `50`); empty for null.
fn metric_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
