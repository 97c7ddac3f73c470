use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::{Error, Result};
use crate::extract::{effective_len, extract_frac, extract_int, Extracted};
use crate::layout::{FieldSpec, DAY, FRACTION, HOUR, MINUTE, MONTH, SECOND, YEAR};

/// The last unit present in a parsed timestamp.
///
/// A timestamp may only end on one of these boundaries; components after it take their
/// default values.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resolution {
    /// `2000`
    Year,
    /// `2000-01-02`
    Day,
    /// `2000-01-02 12:13`
    Minute,
    /// `2000-01-02 12:13:14`, with or without a fraction
    Second,
}

/// Components of a parsed timestamp.
///
/// Components are not checked against the calendar, e.g., `2000-02-30` parses fine. Use
/// [Timestamp::to_naive_datetime] to get a validated calendar value.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamp {
    pub year: u16,
    /// Defaults to 1
    pub month: u8,
    /// Defaults to 1
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Seconds of the minute including the fractional part.
    ///
    /// Always less than the parsed integer seconds plus one, even when the fraction has more
    /// digits than `f64` can represent.
    pub second: f64,
    pub resolution: Resolution,
}

/// Parse a timestamp with the layout `YYYY-MM-DD HH:MM:SS.fff...` from the first `max_len`
/// bytes of `buf`.
///
/// A zero byte before `max_len` ends the input, so zero padded fixed width cells can be
/// passed directly. `max_len` is clamped to the length of `buf`.
///
/// The input may stop after the year, the day, the minute or the integer seconds. Stopping
/// anywhere else is an error. The fraction may have any number of digits.
///
/// # Errors
/// [Error::FieldTruncated] if the input is empty or ends in the middle of a unit,
/// [Error::MissingSeparator] if a field is not preceded by its separator, or
/// [Error::NonDigit] if a field contains something other than ASCII digits.
///
/// # Example
/// ```
/// use fixedtime::{parse_timestamp, Resolution};
///
/// let ts = parse_timestamp(b"2020-01-24 12:13:14.5\0\0\0", 24).unwrap();
/// assert_eq!((ts.year, ts.month, ts.day), (2020, 1, 24));
/// assert_eq!((ts.hour, ts.minute, ts.second), (12, 13, 14.5));
/// assert_eq!(ts.resolution, Resolution::Second);
/// ```
pub fn parse_timestamp(buf: &[u8], max_len: usize) -> Result<Timestamp> {
    let str_len = effective_len(buf, max_len);

    // Digit counts in the layout keep every cast below lossless
    let year = required(buf, str_len, &YEAR)?;
    let mut ts = Timestamp {
        year: year as u16,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0.0,
        resolution: Resolution::Year,
    };

    let Extracted::Present(month) = extract_int(buf, str_len, &MONTH)? else {
        return Ok(ts);
    };
    ts.month = month as u8;
    ts.day = required(buf, str_len, &DAY)? as u8;
    ts.resolution = Resolution::Day;

    let Extracted::Present(hour) = extract_int(buf, str_len, &HOUR)? else {
        return Ok(ts);
    };
    ts.hour = hour as u8;
    ts.minute = required(buf, str_len, &MINUTE)? as u8;
    ts.resolution = Resolution::Minute;

    let Extracted::Present(second) = extract_int(buf, str_len, &SECOND)? else {
        return Ok(ts);
    };
    let frac = extract_frac(buf, str_len, &FRACTION)?;
    ts.second = add_fraction(second, frac);
    ts.resolution = Resolution::Second;

    Ok(ts)
}

/// `second + frac`, kept below `second + 1` where the sum would round up to it.
fn add_fraction(second: u32, frac: f64) -> f64 {
    let sum = f64::from(second) + frac;
    let next = f64::from(second + 1);
    if sum < next {
        sum
    } else {
        // next is positive, so the previous bit pattern is the next smaller f64
        f64::from_bits(next.to_bits() - 1)
    }
}

/// Extract a field that may not be absent.
fn required(buf: &[u8], str_len: usize, spec: &FieldSpec) -> Result<u32> {
    match extract_int(buf, str_len, spec)? {
        Extracted::Present(v) => Ok(v),
        Extracted::Absent => Err(Error::FieldTruncated {
            field: spec.field(),
            offset: spec.start(),
        }),
    }
}

impl Timestamp {
    /// Parse all of `buf`, or up to the first zero byte.
    pub fn from_bytes(buf: &[u8]) -> Result<Timestamp> {
        parse_timestamp(buf, buf.len())
    }

    /// Convert to a calendar date and time, returning `None` if the components do not
    /// represent a valid date or time of day. The fraction is rounded to nanoseconds.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?;
        if !(0.0..60.0).contains(&self.second) {
            return None;
        }
        let whole = self.second.trunc();
        let nanos = ((self.second - whole) * 1e9).round() as i64;
        let time = NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            whole as u32,
        )?;
        // Rounding may carry into the next second, minute, hour or day
        NaiveDateTime::new(date, time).checked_add_signed(TimeDelta::nanoseconds(nanos))
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Timestamp::from_bytes(s.as_bytes())
    }
}

/// Formats using the layout accepted by [parse_timestamp], up to the timestamp's
/// [Resolution]. Seconds are written with 6 fractional digits, rounded but never carried
/// into the next whole second.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if self.resolution == Resolution::Year {
            return Ok(());
        }
        write!(f, "-{:02}-{:02}", self.month, self.day)?;
        if self.resolution == Resolution::Day {
            return Ok(());
        }
        write!(f, " {:02}:{:02}", self.hour, self.minute)?;
        if self.resolution == Resolution::Minute {
            return Ok(());
        }
        let whole = self.second.trunc();
        let micros = (((self.second - whole) * 1e6).round() as u32).min(999_999);
        write!(f, ":{:02}.{:06}", whole as u32, micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::layout::Field;
    use test_case::test_case;

    fn components(ts: &Timestamp) -> (u16, u8, u8, u8, u8, f64) {
        (ts.year, ts.month, ts.day, ts.hour, ts.minute, ts.second)
    }

    #[test_case("2000", (2000, 1, 1, 0, 0, 0.0), Resolution::Year; "year only")]
    #[test_case("2000-01-02", (2000, 1, 2, 0, 0, 0.0), Resolution::Day; "date")]
    #[test_case("2000-01-02 12:13", (2000, 1, 2, 12, 13, 0.0), Resolution::Minute; "minute")]
    #[test_case("2000-01-02 12:13:14", (2000, 1, 2, 12, 13, 14.0), Resolution::Second; "second")]
    #[test_case("2000-01-02 12:13:14.", (2000, 1, 2, 12, 13, 14.0), Resolution::Second; "bare dot")]
    #[test_case("0000-00-00 00:00:00", (0, 0, 0, 0, 0, 0.0), Resolution::Second; "all zeros")]
    fn truncation_boundaries(
        input: &str,
        expected: (u16, u8, u8, u8, u8, f64),
        resolution: Resolution,
    ) {
        let ts = parse_timestamp(input.as_bytes(), input.len()).unwrap();
        assert_eq!(components(&ts), expected);
        assert_eq!(ts.resolution, resolution);
    }

    #[test_case("", Field::Year, ErrorKind::FieldTruncated; "empty")]
    #[test_case("200", Field::Year, ErrorKind::FieldTruncated; "short year")]
    #[test_case("2000-", Field::Month, ErrorKind::FieldTruncated; "dangling separator")]
    #[test_case("2000-01", Field::Day, ErrorKind::FieldTruncated; "year and month")]
    #[test_case("2000-01-0", Field::Day, ErrorKind::FieldTruncated; "partial day")]
    #[test_case("2000-01-02 12", Field::Minute, ErrorKind::FieldTruncated; "hour only")]
    #[test_case("2000-01-02 12:13:1", Field::Second, ErrorKind::FieldTruncated; "partial seconds")]
    #[test_case("2000/01-02", Field::Month, ErrorKind::MissingSeparator; "slash")]
    #[test_case("2000-01-02T12:13:14", Field::Hour, ErrorKind::MissingSeparator; "T separator")]
    #[test_case("2000-01-02 12-13", Field::Minute, ErrorKind::MissingSeparator; "dash in time")]
    #[test_case("2000-0a-02", Field::Month, ErrorKind::NonDigit; "letter in month")]
    #[test_case("2000-01-02 12:13:14.5x", Field::Fraction, ErrorKind::NonDigit; "letter in fraction")]
    #[test_case("2000-01-02 12:13:14Z", Field::Fraction, ErrorKind::MissingSeparator; "zulu suffix")]
    fn malformed(input: &str, field: Field, kind: ErrorKind) {
        let err = parse_timestamp(input.as_bytes(), input.len()).unwrap_err();
        assert_eq!(err.kind(), kind, "{input:?}: {err}");
        assert_eq!(err.field(), field, "{input:?}: {err}");
    }

    #[test]
    fn fraction() {
        let ts: Timestamp = "2000-01-02 12:13:14.5556".parse().unwrap();
        assert!((ts.second - 14.5556).abs() < 1e-9, "got {}", ts.second);
    }

    #[test]
    fn whole_seconds_are_exact() {
        let ts: Timestamp = "2000-01-02 12:13:14".parse().unwrap();
        assert_eq!(ts.second, 14.0);
    }

    #[test]
    fn zero_padded_matches_exact() {
        let padded = b"2000-01-02\0\0\0\0\0\0\0\0\0\0\0\0\0\0";
        assert_eq!(padded.len(), 24);
        let exact = b"2000-01-02";

        let a = parse_timestamp(padded, 24).unwrap();
        let b = parse_timestamp(exact, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn max_len_limits_input() {
        let ts = parse_timestamp(b"2000-01-02 12:13:14", 10).unwrap();
        assert_eq!(ts.resolution, Resolution::Day);
    }

    #[test]
    fn max_len_past_slice_is_clamped() {
        let ts = parse_timestamp(b"2000-01-02", 1024).unwrap();
        assert_eq!(components(&ts), (2000, 1, 2, 0, 0, 0.0));
    }

    #[test]
    fn deterministic() {
        let buf = b"1999-12-31 23:59:59.999999";
        let a = parse_timestamp(buf, buf.len());
        let b = parse_timestamp(buf, buf.len());
        assert_eq!(a, b);
    }

    #[test]
    fn calendar_is_not_validated() {
        let ts: Timestamp = "2001-02-30 25:61:99".parse().unwrap();
        assert_eq!(components(&ts), (2001, 2, 30, 25, 61, 99.0));
        assert_eq!(ts.to_naive_datetime(), None);
    }

    #[test]
    fn to_naive_datetime() {
        let ts: Timestamp = "2020-01-24 12:13:14.5".parse().unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 1, 24)
            .unwrap()
            .and_hms_milli_opt(12, 13, 14, 500)
            .unwrap();
        assert_eq!(ts.to_naive_datetime(), Some(expected));
    }

    #[test]
    fn to_naive_datetime_rounds_into_next_second() {
        let ts: Timestamp = "2020-01-24 12:13:14.9999999999".parse().unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 1, 24)
            .unwrap()
            .and_hms_opt(12, 13, 15)
            .unwrap();
        assert_eq!(ts.to_naive_datetime(), Some(expected));
    }

    #[test]
    fn to_naive_datetime_carries_past_minute() {
        let ts: Timestamp = "2020-01-24 12:13:59.9999999999".parse().unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 1, 24)
            .unwrap()
            .and_hms_opt(12, 14, 0)
            .unwrap();
        assert_eq!(ts.to_naive_datetime(), Some(expected));
    }

    #[test]
    fn to_naive_datetime_carries_into_next_day() {
        let ts: Timestamp = "2020-12-31 23:59:59.9999999999".parse().unwrap();
        let expected = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(ts.to_naive_datetime(), Some(expected));
    }

    #[test]
    fn long_run_of_nines_stays_in_second() {
        let ts: Timestamp = "2000-01-02 12:13:14.99999999999999999999".parse().unwrap();
        assert!(ts.second < 15.0, "got {}", ts.second);
        assert_eq!(ts.second.trunc(), 14.0);
        assert_eq!(ts.to_string(), "2000-01-02 12:13:14.999999");
    }

    #[test_case("2000-01-02 12:13:59.9999999", "2000-01-02 12:13:59.999999"; "end of minute")]
    #[test_case("2000-01-02 12:13:14.5556", "2000-01-02 12:13:14.555600"; "rounds to micros")]
    #[test_case("2000-01-02 12:13:14.0000004", "2000-01-02 12:13:14.000000"; "below a micro")]
    fn display_seconds(input: &str, expected: &str) {
        let ts: Timestamp = input.parse().unwrap();
        assert_eq!(ts.to_string(), expected);
    }

    #[test_case("2000"; "year")]
    #[test_case("2000-01-02"; "day")]
    #[test_case("2000-01-02 12:13"; "minute")]
    #[test_case("2000-01-02 12:13:04.250000"; "second")]
    fn display_matches_input(input: &str) {
        let ts: Timestamp = input.parse().unwrap();
        assert_eq!(ts.to_string(), input);
    }
}
