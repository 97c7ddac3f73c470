use std::fs;
use std::io::{stdout, Write};
use std::path::Path;

use anyhow::{Context, Result};
use fixedtime::{CellEncoding, ColumnParser};
use tracing::{info, warn};

pub fn column(input: &Path, width: usize, ucs4: bool, threads: usize, strict: bool) -> Result<()> {
    let buf = fs::read(input).with_context(|| format!("failed to read {input:?}"))?;
    let encoding = if ucs4 {
        CellEncoding::Ucs4
    } else {
        CellEncoding::Bytes
    };
    let parser = ColumnParser::builder()
        .width(width)
        .num_threads(threads)
        .encoding(encoding)
        .build();

    let mut out = stdout().lock();
    if strict {
        let times = parser
            .parse_strict(&buf)
            .with_context(|| format!("parsing {input:?}"))?;
        for ts in &times {
            writeln!(out, "{ts}")?;
        }
        info!("parsed {} rows", times.len());
        return Ok(());
    }

    let zults = parser
        .parse(&buf)
        .with_context(|| format!("parsing {input:?}"))?;
    let mut rejected = 0;
    for (row, zult) in zults.iter().enumerate() {
        match zult {
            Ok(ts) => writeln!(out, "{ts}")?,
            Err(err) => {
                warn!(row, "invalid timestamp: {err}");
                writeln!(out, "error: {err}")?;
                rejected += 1;
            }
        }
    }
    info!("parsed {} rows; {rejected} rejected", zults.len());
    Ok(())
}
