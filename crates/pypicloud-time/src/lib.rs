use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use thiserror::Error;

/// 1970-01-01T00:00:00Z.
pub const EPOCH: Timestamp = Timestamp::UNIX_EPOCH;

const MICROS_PER_SECOND: i128 = 1_000_000;

/// The Unix epoch as a datetime in UTC.
pub fn epoch() -> Zoned {
    EPOCH.to_zoned(TimeZone::UTC)
}

/// Convert a datetime to a float timestamp (seconds since the Unix epoch).
///
/// The elapsed time is reduced to whole microseconds before dividing, so that the result
/// matches a microsecond-precision datetime exactly where `f64` allows. Datetimes before the
/// epoch produce negative timestamps.
pub fn dt2ts(dt: &Zoned) -> f64 {
    let elapsed = dt.timestamp().duration_since(EPOCH);
    let micros = i128::from(elapsed.as_secs()) * MICROS_PER_SECOND
        + i128::from(elapsed.subsec_micros());
    #[allow(clippy::cast_precision_loss)]
    let micros = micros as f64;
    micros / 1_000_000.0
}

/// Convert a float timestamp (seconds since the Unix epoch) to a datetime in UTC.
///
/// The timestamp is rounded to the nearest microsecond, with ties to even.
pub fn ts2dt(ts: f64) -> Result<Zoned, TimestampError> {
    if !ts.is_finite() {
        return Err(TimestampError::NotFinite(ts));
    }
    // Out-of-range values saturate here and are rejected by `from_microsecond`.
    #[allow(clippy::cast_possible_truncation)]
    let micros = (ts * 1_000_000.0).round_ties_even() as i64;
    let timestamp =
        Timestamp::from_microsecond(micros).map_err(|err| TimestampError::OutOfRange(ts, err))?;
    Ok(timestamp.to_zoned(TimeZone::UTC))
}

#[derive(Error, Debug)]
pub enum TimestampError {
    #[error("Timestamp `{0}` is not a finite number")]
    NotFinite(f64),
    #[error("Timestamp `{0}` is out of range")]
    OutOfRange(f64, #[source] jiff::Error),
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn epoch_is_zero() {
        assert_eq!(ts2dt(0.0).unwrap(), epoch());
        assert_eq!(dt2ts(&epoch()), 0.0);
    }

    #[test]
    fn known_datetime() {
        let dt = date(2017, 7, 14)
            .at(2, 40, 0, 500_000_000)
            .to_zoned(TimeZone::UTC)
            .unwrap();
        assert_eq!(dt2ts(&dt), 1_500_000_000.5);
        assert_eq!(ts2dt(1_500_000_000.5).unwrap(), dt);
    }

    #[test]
    fn before_epoch() {
        let dt = date(1969, 12, 31)
            .at(23, 59, 59, 250_000_000)
            .to_zoned(TimeZone::UTC)
            .unwrap();
        assert_eq!(dt2ts(&dt), -0.75);
        assert_eq!(ts2dt(-0.75).unwrap(), dt);
    }

    #[test]
    fn other_time_zones() {
        let dt = date(1970, 1, 1)
            .at(1, 0, 0, 0)
            .to_zoned(TimeZone::fixed(jiff::tz::offset(1)))
            .unwrap();
        assert_eq!(dt2ts(&dt), 0.0);
    }

    #[test]
    fn round_trip() {
        for ts in [
            0.0,
            1.0,
            -1.0,
            0.000_001,
            1_234_567_890.123_456,
            1_500_000_000.999_999,
            -86_400.5,
            32_503_680_000.0,
        ] {
            let round_tripped = dt2ts(&ts2dt(ts).unwrap());
            assert!((round_tripped - ts).abs() < 1e-6, "{ts} != {round_tripped}");
        }
    }

    #[test]
    fn invalid() {
        assert!(matches!(ts2dt(f64::NAN), Err(TimestampError::NotFinite(_))));
        assert!(matches!(
            ts2dt(f64::INFINITY),
            Err(TimestampError::NotFinite(_))
        ));
        assert!(matches!(ts2dt(1e20), Err(TimestampError::OutOfRange(..))));
    }
}
