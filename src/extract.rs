//! Field extraction primitives.
//!
//! These operate on an immutable byte view and an effective length, never allocate, and
//! never read outside of `buf`. They are public so other fixed layouts can be described
//! with custom [FieldSpec]s and [FracSpec]s.
use crate::error::{Error, Result};
use crate::layout::{Field, FieldSpec, FracSpec};

/// Largest `f64` below 1.0.
pub const MAX_FRACTION: f64 = 1.0 - f64::EPSILON / 2.0;

/// Successful outcome of extracting an optional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extracted<T> {
    Present(T),
    /// The input ends exactly where the field would start.
    Absent,
}

impl<T> Extracted<T> {
    pub fn present(self) -> Option<T> {
        match self {
            Extracted::Present(v) => Some(v),
            Extracted::Absent => None,
        }
    }
}

/// Returns the offset of the first zero byte in `buf[..max_len]`, or `max_len` if there is
/// none. `max_len` is clamped to `buf.len()`.
pub fn effective_len(buf: &[u8], max_len: usize) -> usize {
    let max_len = max_len.min(buf.len());
    buf[..max_len]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(max_len)
}

/// Extract the non-negative integer described by `spec` from `buf`, where `str_len` is the
/// effective length of the input.
///
/// A zero byte inside the field shortens the effective length for this call.
///
/// # Errors
/// [Error::FieldTruncated] if the input ends after the start of the field but before its end,
/// [Error::MissingSeparator] if the byte at the start of the field is not the required
/// separator, or [Error::NonDigit] if any byte in the digit run is not an ASCII digit.
pub fn extract_int(buf: &[u8], str_len: usize, spec: &FieldSpec) -> Result<Extracted<u32>> {
    let field = spec.field();
    let mut start = spec.start();
    let end = spec.end();
    let mut str_len = str_len.min(buf.len());

    if start < str_len {
        let stop = str_len.min(end + 1);
        if let Some(pos) = buf[start..stop].iter().position(|&b| b == 0) {
            str_len = start + pos;
        }
    }

    if start == str_len {
        return Ok(Extracted::Absent);
    }
    if end >= str_len {
        return Err(Error::FieldTruncated {
            field,
            offset: str_len,
        });
    }

    if let Some(sep) = spec.separator() {
        if buf[start] != sep {
            return Err(Error::MissingSeparator {
                field,
                offset: start,
                expected: sep,
            });
        }
        start += 1;
    }

    // FieldSpec caps the digit count, so this cannot overflow
    let mut value = 0u32;
    for (offset, &byte) in (start..=end).zip(&buf[start..=end]) {
        if !byte.is_ascii_digit() {
            return Err(Error::NonDigit {
                field,
                offset,
                byte,
            });
        }
        value = value * 10 + u32::from(byte - b'0');
    }

    Ok(Extracted::Present(value))
}

/// Extract the fraction described by `spec`, using all digits from the start of the field
/// up to `str_len`. Returns a value in `[0, 1)`; a long run of nines that would round up to
/// 1.0 yields [MAX_FRACTION] instead.
///
/// An input ending exactly at the start of the fraction yields `0.0`. A separator with no
/// digits after it also yields `0.0`.
///
/// There is no limit on the number of digits. Precision is that of `f64`, so digits beyond
/// roughly the 16th significant digit do not change the result in a meaningful way.
///
/// # Errors
/// [Error::FieldTruncated] if the input ends before the start of the field,
/// [Error::MissingSeparator] if the separator is required but not found, or
/// [Error::NonDigit] for any byte that is not an ASCII digit.
pub fn extract_frac(buf: &[u8], str_len: usize, spec: &FracSpec) -> Result<f64> {
    let field = Field::Fraction;
    let mut start = spec.start();
    let str_len = str_len.min(buf.len());

    if start == str_len {
        return Ok(0.0);
    }
    if start > str_len {
        return Err(Error::FieldTruncated {
            field,
            offset: str_len,
        });
    }

    if let Some(sep) = spec.separator() {
        if buf[start] != sep {
            return Err(Error::MissingSeparator {
                field,
                offset: start,
                expected: sep,
            });
        }
        start += 1;
    }

    let mut value = 0.0;
    let mut weight = 0.1;
    for (offset, &byte) in (start..str_len).zip(&buf[start..str_len]) {
        if !byte.is_ascii_digit() {
            return Err(Error::NonDigit {
                field,
                offset,
                byte,
            });
        }
        value += f64::from(byte - b'0') * weight;
        weight /= 10.0;
    }

    Ok(value.min(MAX_FRACTION))
}
