//! Native visit-time decoding.
//!
//! Each browser stores visit times against its own epoch and unit:
//!
//! | browser        | epoch                | unit         |
//! |----------------|----------------------|--------------|
//! | Safari         | 2001-01-01T00:00:00Z | seconds      |
//! | Chrome / Brave | 1601-01-01T00:00:00Z | microseconds |
//! | Firefox        | 1970-01-01T00:00:00Z | microseconds |
//!
//! Values are not range-checked against "plausible" dates. A corrupt value
//! decodes to whatever instant it names, and only values that leave chrono's
//! representable range are reported as errors.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use thiserror::Error;

use crate::history::Browser;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("{browser} visit time {raw} is outside the representable range")]
    OutOfRange { browser: Browser, raw: String },
}

/// Seconds between 1601-01-01 and 1970-01-01.
pub const WEBKIT_UNIX_OFFSET_SECS: i64 = 11_644_473_600;
/// Seconds between 1970-01-01 and 2001-01-01.
pub const SAFARI_UNIX_OFFSET_SECS: i64 = 978_307_200;

fn epoch(browser: Browser) -> DateTime<Utc> {
    let (y, m, d) = match browser {
        Browser::Safari => (2001, 1, 1),
        Browser::Chrome | Browser::Brave => (1601, 1, 1),
        Browser::Firefox => (1970, 1, 1),
    };
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Decode an integer visit time in the browser's native encoding.
pub fn decode(browser: Browser, raw: i64) -> Result<DateTime<Utc>, TimestampError> {
    let delta = match browser {
        Browser::Safari => TimeDelta::try_seconds(raw),
        Browser::Chrome | Browser::Brave | Browser::Firefox => Some(TimeDelta::microseconds(raw)),
    };
    delta
        .and_then(|delta| epoch(browser).checked_add_signed(delta))
        .ok_or_else(|| TimestampError::OutOfRange {
            browser,
            raw: raw.to_string(),
        })
}

/// Safari keeps `history_visits.visit_time` as a REAL column of fractional
/// seconds; the fraction is kept to microsecond precision.
pub fn decode_safari_seconds(seconds: f64) -> Result<DateTime<Utc>, TimestampError> {
    let out_of_range = || TimestampError::OutOfRange {
        browser: Browser::Safari,
        raw: seconds.to_string(),
    };
    if !seconds.is_finite() {
        return Err(out_of_range());
    }
    let micros = (seconds * 1_000_000.0).round();
    if micros.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }
    epoch(Browser::Safari)
        .checked_add_signed(TimeDelta::microseconds(micros as i64))
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn may_first_2023() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).single().expect("date")
    }

    #[test]
    fn decodes_chrome_microseconds_since_1601() {
        let raw = (1_682_899_200 + WEBKIT_UNIX_OFFSET_SECS) * 1_000_000;
        assert_eq!(raw, 13_327_372_800_000_000);
        assert_eq!(decode(Browser::Chrome, raw).expect("decode"), may_first_2023());
        assert_eq!(decode(Browser::Brave, raw).expect("decode"), may_first_2023());
    }

    #[test]
    fn decodes_chrome_vector_from_documentation() {
        let decoded = decode(Browser::Chrome, 13_320_537_600_000_000).expect("decode");
        let expected = Utc.with_ymd_and_hms(2023, 2, 10, 21, 20, 0).single().expect("date");
        assert_eq!(decoded, expected);
    }

    #[test]
    fn decodes_safari_seconds_since_2001() {
        assert_eq!(
            decode(Browser::Safari, 704_592_000).expect("decode"),
            may_first_2023()
        );
        assert_eq!(
            decode_safari_seconds(704_592_000.0).expect("decode"),
            may_first_2023()
        );
        assert_eq!(
            704_592_000 + SAFARI_UNIX_OFFSET_SECS,
            may_first_2023().timestamp()
        );
    }

    #[test]
    fn keeps_safari_fractional_seconds() {
        let decoded = decode_safari_seconds(704_592_000.25).expect("decode");
        assert_eq!(decoded.timestamp_subsec_micros(), 250_000);
    }

    #[test]
    fn decodes_firefox_unix_microseconds() {
        assert_eq!(
            decode(Browser::Firefox, 1_682_899_200_000_000).expect("decode"),
            may_first_2023()
        );
    }

    #[test]
    fn zero_is_the_epoch() {
        assert_eq!(decode(Browser::Firefox, 0).expect("decode").timestamp(), 0);
        assert_eq!(
            decode(Browser::Chrome, 0).expect("decode").timestamp(),
            -WEBKIT_UNIX_OFFSET_SECS
        );
    }

    #[test]
    fn huge_values_are_out_of_range() {
        assert!(matches!(
            decode(Browser::Safari, i64::MAX),
            Err(TimestampError::OutOfRange { .. })
        ));
        assert!(decode_safari_seconds(f64::NAN).is_err());
        assert!(decode_safari_seconds(1e300).is_err());
    }
}
