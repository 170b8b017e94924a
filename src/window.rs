// Query windows: closed time ranges resolved from a named period or given explicitly.
// Periods are fixed lengths anchored at "now"; a month is always 30 days.

use crate::error::{Error, Result};
use crate::models::format_timestamp;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub fn duration(self) -> Duration {
        match self {
            Period::Day => Duration::hours(24),
            Period::Week => Duration::days(7),
            Period::Month => Duration::days(30),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown keywords are rejected rather than widened to all history.
impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            _ => Err(Error::InvalidPeriod(s.to_string())),
        }
    }
}

/// Closed interval `[start, end]`. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Window {
    /// All history.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Explicit range; fails when both bounds are set and `start > end`.
    pub fn between(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(Error::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| *ts >= s) && self.end.is_none_or(|e| *ts <= e)
    }

    /// Bounds in the stored text format. Stored timestamps have millisecond precision, so
    /// the start is rounded up and the end down to whole milliseconds; text comparison
    /// then agrees with `contains`.
    pub(crate) fn sql_bounds(&self) -> (Option<String>, Option<String>) {
        (
            self.start.map(|s| format_timestamp(&ceil_millis(s))),
            self.end.map(|e| format_timestamp(&e.trunc_subsecs(3))),
        )
    }
}

/// Window for `period` ending now. `None` gives all history.
pub fn resolve(period: Option<Period>) -> Window {
    resolve_at(period, Utc::now())
}

/// Same as [`resolve`] with an explicit anchor. A start before the earliest
/// representable time is left unbounded.
pub fn resolve_at(period: Option<Period>, now: DateTime<Utc>) -> Window {
    let Some(period) = period else {
        return Window::unbounded();
    };
    let end = now.trunc_subsecs(3);
    Window {
        start: end.checked_sub_signed(period.duration()),
        end: Some(end),
    }
}

fn ceil_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    let floor = ts.trunc_subsecs(3);
    if floor == ts {
        ts
    } else {
        floor + Duration::milliseconds(1)
    }
}
