use std::str::FromStr;

use anstream::println;
use anyhow::{Context, Result};
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};

use pypicloud_time::{dt2ts as datetime_to_timestamp, ts2dt as timestamp_to_datetime};

use crate::commands::ExitStatus;

/// Print the UTC datetime for a float timestamp.
pub(crate) fn ts2dt(timestamp: f64) -> Result<ExitStatus> {
    let datetime = timestamp_to_datetime(timestamp)?;
    println!("{datetime}");
    Ok(ExitStatus::Success)
}

/// Print the float timestamp for a datetime.
pub(crate) fn dt2ts(datetime: &str) -> Result<ExitStatus> {
    let datetime = match Timestamp::from_str(datetime) {
        Ok(timestamp) => timestamp.to_zoned(TimeZone::UTC),
        Err(_) => Zoned::from_str(datetime)
            .with_context(|| format!("Failed to parse datetime: `{datetime}`"))?,
    };
    println!("{}", datetime_to_timestamp(&datetime));
    Ok(ExitStatus::Success)
}
