use crate::layout::Field;

/// Kind of malformed input, without any diagnostic context.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input ends partway through a field that must be complete.
    #[error("field truncated")]
    FieldTruncated,
    /// The delimiter required before a field is missing or wrong.
    #[error("missing separator")]
    MissingSeparator,
    /// A byte in a digit run is not an ASCII decimal digit.
    #[error("non-digit")]
    NonDigit,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("{field} field truncated; input ends at byte {offset}")]
    FieldTruncated {
        field: Field,
        /// Effective length of the input
        offset: usize,
    },

    #[error("expected {:?} before {field} field at byte {offset}", as_char(.expected))]
    MissingSeparator {
        field: Field,
        offset: usize,
        /// Separator byte required at `offset`
        expected: u8,
    },

    #[error("non-digit byte {byte:#04x} in {field} field at byte {offset}")]
    NonDigit {
        field: Field,
        offset: usize,
        /// The offending byte
        byte: u8,
    },
}

fn as_char(byte: &u8) -> char {
    char::from(*byte)
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FieldTruncated { .. } => ErrorKind::FieldTruncated,
            Error::MissingSeparator { .. } => ErrorKind::MissingSeparator,
            Error::NonDigit { .. } => ErrorKind::NonDigit,
        }
    }

    /// The field being parsed when the error was detected.
    pub fn field(&self) -> Field {
        match *self {
            Error::FieldTruncated { field, .. }
            | Error::MissingSeparator { field, .. }
            | Error::NonDigit { field, .. } => field,
        }
    }

    /// Byte offset into the input at which the error was detected.
    pub fn offset(&self) -> usize {
        match *self {
            Error::FieldTruncated { offset, .. }
            | Error::MissingSeparator { offset, .. }
            | Error::NonDigit { offset, .. } => offset,
        }
    }
}

impl From<Error> for ErrorKind {
    fn from(err: Error) -> Self {
        err.kind()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
