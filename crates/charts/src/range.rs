//! Calendar buckets in UTC.

use crate::error::ChartError;
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HOUR_MS: i64 = 3_600_000;

/// Width of a chart bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartRange {
    /// Clock hour.
    Hour,
    /// Week starting Sunday 00:00.
    Week,
    /// Calendar month.
    Month,
}

impl ChartRange {
    /// Start of the bucket containing `timestamp`, in milliseconds.
    pub fn bucket_start(&self, timestamp: i64) -> Result<i64, ChartError> {
        match self {
            ChartRange::Hour => timestamp
                .div_euclid(HOUR_MS)
                .checked_mul(HOUR_MS)
                .ok_or(ChartError::TimestampOutOfRange(timestamp)),
            ChartRange::Week => {
                let date = to_date(timestamp)?;
                let back = u64::from(date.weekday().num_days_from_sunday());
                let sunday = date
                    .checked_sub_days(Days::new(back))
                    .ok_or(ChartError::TimestampOutOfRange(timestamp))?;
                midnight_ms(sunday, timestamp)
            }
            ChartRange::Month => {
                let date = to_date(timestamp)?;
                let first = date
                    .with_day(1)
                    .ok_or(ChartError::TimestampOutOfRange(timestamp))?;
                midnight_ms(first, timestamp)
            }
        }
    }

    /// Start of the bucket following the one that starts at `start`.
    pub fn next_bucket_start(&self, start: i64) -> Result<i64, ChartError> {
        let out_of_range = || ChartError::TimestampOutOfRange(start);
        match self {
            ChartRange::Hour => start.checked_add(HOUR_MS).ok_or_else(out_of_range),
            ChartRange::Week => start
                .checked_add(TimeDelta::weeks(1).num_milliseconds())
                .ok_or_else(out_of_range),
            ChartRange::Month => {
                let next = to_date(start)?
                    .checked_add_months(Months::new(1))
                    .ok_or_else(out_of_range)?;
                midnight_ms(next, start)
            }
        }
    }
}

fn to_date(timestamp: i64) -> Result<NaiveDate, ChartError> {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|dt| dt.date_naive())
        .ok_or(ChartError::TimestampOutOfRange(timestamp))
}

fn midnight_ms(date: NaiveDate, source: i64) -> Result<i64, ChartError> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .ok_or(ChartError::TimestampOutOfRange(source))
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartRange::Hour => "hour",
            ChartRange::Week => "week",
            ChartRange::Month => "month",
        };
        f.write_str(name)
    }
}

impl FromStr for ChartRange {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(ChartRange::Hour),
            "week" => Ok(ChartRange::Week),
            "month" => Ok(ChartRange::Month),
            _ => Err(ChartError::UnknownRange(s.to_string())),
        }
    }
}
