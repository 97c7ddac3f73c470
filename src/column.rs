//! Parsing of fixed width timestamp columns.
//!
//! A column is a contiguous buffer of equal width cells, e.g., a 2-d array of characters
//! read from a table, where each cell may be zero padded.
use rayon::prelude::*;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use crate::error::Error;
use crate::timestamp::{parse_timestamp, Timestamp};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ColumnError {
    #[error("{len} bytes is not a whole number of {width} byte cells")]
    Shape { len: usize, width: usize },

    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Error,
    },

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// How characters are stored in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellEncoding {
    /// One byte per character.
    #[default]
    Bytes,
    /// Four little-endian bytes per character, as used by numpy unicode arrays.
    ///
    /// Characters above 0x7f cannot be part of a valid timestamp and are narrowed to 0xff.
    Ucs4,
}

impl CellEncoding {
    fn char_width(&self) -> usize {
        match self {
            CellEncoding::Bytes => 1,
            CellEncoding::Ucs4 => 4,
        }
    }
}

/// Zero-copy view of a column of byte encoded cells.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    buf: &'a [u8],
    width: usize,
}

impl<'a> Column<'a> {
    /// # Errors
    /// [ColumnError::Shape] if `width` is 0 or `buf` is not a multiple of `width`.
    pub fn new(buf: &'a [u8], width: usize) -> Result<Self, ColumnError> {
        check_shape(buf, width, CellEncoding::Bytes)?;
        Ok(Self { buf, width })
    }

    pub fn len(&self) -> usize {
        self.buf.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Bytes for the cell at `row`, including any padding.
    pub fn cell(&self, row: usize) -> Option<&'a [u8]> {
        let start = row.checked_mul(self.width)?;
        self.buf.get(start..start.checked_add(self.width)?)
    }

    /// Lazily parse each cell in row order.
    pub fn iter(&self) -> impl Iterator<Item = crate::Result<Timestamp>> + 'a {
        let width = self.width;
        self.buf
            .chunks_exact(width)
            .map(move |cell| parse_timestamp(cell, width))
    }
}

fn check_shape(buf: &[u8], width: usize, encoding: CellEncoding) -> Result<(), ColumnError> {
    if width == 0 || width % encoding.char_width() != 0 || buf.len() % width != 0 {
        return Err(ColumnError::Shape {
            len: buf.len(),
            width,
        });
    }
    Ok(())
}

/// Parses whole columns in parallel.
///
/// ```
/// use fixedtime::ColumnParser;
///
/// let buf = b"2000-01-02\0\0\0\0\0\02001-02-03 04:05";
/// let parser = ColumnParser::builder().width(16).build();
/// let times = parser.parse_strict(buf).unwrap();
/// assert_eq!(times[1].minute, 5);
/// ```
#[derive(TypedBuilder, Debug, Clone)]
pub struct ColumnParser {
    /// Width of each cell in bytes.
    width: usize,
    /// Number of threads to use. 0 lets rayon decide.
    #[builder(default)]
    num_threads: usize,
    #[builder(default)]
    encoding: CellEncoding,
}

impl ColumnParser {
    /// Parse every cell in `buf`, returning the result for each row in row order.
    ///
    /// # Errors
    /// [ColumnError::Shape] if `buf` cannot be split into cells of the configured width and
    /// encoding, or [ColumnError::ThreadPool] if the thread pool could not be created.
    pub fn parse(&self, buf: &[u8]) -> Result<Vec<crate::Result<Timestamp>>, ColumnError> {
        check_shape(buf, self.width, self.encoding)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("fixedtime::column{i}"))
            .num_threads(self.num_threads)
            .build()?;

        let width = self.width;
        debug!(
            rows = buf.len() / width,
            width,
            encoding = ?self.encoding,
            threads = pool.current_num_threads(),
            "parsing column"
        );

        let zults: Vec<crate::Result<Timestamp>> = pool.install(|| match self.encoding {
            CellEncoding::Bytes => buf
                .par_chunks(width)
                .enumerate()
                .map(|(row, cell)| log_rejected(row, parse_timestamp(cell, width)))
                .collect(),
            CellEncoding::Ucs4 => buf
                .par_chunks(width)
                .enumerate()
                .map_init(
                    || Vec::with_capacity(width / 4),
                    |narrow, (row, cell)| {
                        narrow_ucs4(cell, narrow);
                        log_rejected(row, parse_timestamp(narrow, narrow.len()))
                    },
                )
                .collect(),
        });

        debug!(
            rows = zults.len(),
            rejected = zults.iter().filter(|z| z.is_err()).count(),
            "parsed column"
        );
        Ok(zults)
    }

    /// Like [ColumnParser::parse], but fails on the first row that does not parse.
    ///
    /// # Errors
    /// Any error from [ColumnParser::parse], or [ColumnError::Row] for the lowest numbered
    /// row that failed.
    pub fn parse_strict(&self, buf: &[u8]) -> Result<Vec<Timestamp>, ColumnError> {
        self.parse(buf)?
            .into_iter()
            .enumerate()
            .map(|(row, zult)| zult.map_err(|source| ColumnError::Row { row, source }))
            .collect()
    }
}

fn log_rejected(row: usize, zult: crate::Result<Timestamp>) -> crate::Result<Timestamp> {
    if let Err(err) = &zult {
        trace!(row, %err, "rejected row");
    }
    zult
}

/// Narrow UCS-4 little-endian `cell` to one byte per character in `out`.
fn narrow_ucs4(cell: &[u8], out: &mut Vec<u8>) {
    out.clear();
    out.extend(cell.chunks_exact(4).map(|c| {
        let ch = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
        if ch > 0x7f {
            0xff
        } else {
            ch as u8
        }
    }));
}
