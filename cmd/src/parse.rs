use std::io::{stdout, Write};

use anyhow::{Context, Result};
use fixedtime::parse_timestamp;

#[derive(Debug, Clone)]
pub enum Format {
    Json,
    Text,
}

impl clap::ValueEnum for Format {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Json, Self::Text]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Self::Json => Some(clap::builder::PossibleValue::new("json")),
            Self::Text => Some(clap::builder::PossibleValue::new("text")),
        }
    }
}

pub fn parse(timestamps: &[String], max_len: Option<usize>, format: &Format) -> Result<()> {
    let mut out = stdout().lock();
    for input in timestamps {
        let buf = input.as_bytes();
        let ts = parse_timestamp(buf, max_len.unwrap_or(buf.len()))
            .with_context(|| format!("failed to parse {input:?}"))?;
        match format {
            Format::Text => writeln!(
                out,
                "{} {} {} {} {} {:.6}",
                ts.year, ts.month, ts.day, ts.hour, ts.minute, ts.second
            )?,
            Format::Json => {
                serde_json::to_writer(&mut out, &ts)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
