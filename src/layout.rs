//! Byte layout of the supported timestamp format.
//!
//! ```text
//! 2000-01-12 13:14:15.678
//! 01234567890123456789012
//! ```
//!
//! Every field after the year is described together with the separator byte that
//! precedes it, so the month occupies offsets 4 through 6 (`-01`), the day 7 through 9
//! (`-12`) and so on. The fraction runs from offset 19 to the end of the input.
use std::fmt;

/// Maximum number of digits in an integer field, which keeps accumulation within `u32`.
pub const MAX_FIELD_DIGITS: usize = 9;

/// Length of a timestamp with six fractional digits, e.g., `2000-01-02 12:13:14.000000`.
pub const CANONICAL_LEN: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Fraction,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Fraction => "fraction",
        };
        f.write_str(name)
    }
}

/// Location of a fixed width integer field.
///
/// `start..=end` covers the optional separator and the digits following it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    field: Field,
    start: usize,
    end: usize,
    separator: Option<u8>,
}

impl FieldSpec {
    /// # Panics
    /// If `end < start` or the range leaves no room for a digit after the separator, or if
    /// it holds more than [MAX_FIELD_DIGITS] digits. In a const context this fails to compile.
    pub const fn new(field: Field, start: usize, end: usize, separator: Option<u8>) -> Self {
        assert!(end >= start, "field end must not precede its start");
        let sep_len = if separator.is_some() { 1 } else { 0 };
        let digits = end - start + 1 - sep_len;
        assert!(digits >= 1, "field must hold at least one digit");
        assert!(digits <= MAX_FIELD_DIGITS, "field holds too many digits");
        Self {
            field,
            start,
            end,
            separator,
        }
    }

    pub const fn field(&self) -> Field {
        self.field
    }

    /// Offset of the separator, or of the first digit when there is no separator.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Offset of the last digit, inclusive.
    pub const fn end(&self) -> usize {
        self.end
    }

    pub const fn separator(&self) -> Option<u8> {
        self.separator
    }
}

/// Location of a variable width fractional field that runs to the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FracSpec {
    start: usize,
    separator: Option<u8>,
}

impl FracSpec {
    pub const fn new(start: usize, separator: Option<u8>) -> Self {
        Self { start, separator }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn separator(&self) -> Option<u8> {
        self.separator
    }
}

pub const YEAR: FieldSpec = FieldSpec::new(Field::Year, 0, 3, None);
pub const MONTH: FieldSpec = FieldSpec::new(Field::Month, 4, 6, Some(b'-'));
pub const DAY: FieldSpec = FieldSpec::new(Field::Day, 7, 9, Some(b'-'));
pub const HOUR: FieldSpec = FieldSpec::new(Field::Hour, 10, 12, Some(b' '));
pub const MINUTE: FieldSpec = FieldSpec::new(Field::Minute, 13, 15, Some(b':'));
pub const SECOND: FieldSpec = FieldSpec::new(Field::Second, 16, 18, Some(b':'));
pub const FRACTION: FracSpec = FracSpec::new(19, Some(b'.'));
