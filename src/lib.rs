#![doc = include_str!("../README.md")]

mod error;

pub mod column;
pub mod extract;
pub mod layout;
pub mod timestamp;

pub use column::{CellEncoding, Column, ColumnError, ColumnParser};
pub use error::{Error, ErrorKind, Result};
pub use layout::Field;
pub use timestamp::{parse_timestamp, Resolution, Timestamp};
