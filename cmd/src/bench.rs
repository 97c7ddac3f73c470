use std::hint::black_box;
use std::time::Instant;

use anyhow::{Context, Result};
use fixedtime::parse_timestamp;
use tracing::info;

pub fn bench(timestamp: &str, iterations: u64) -> Result<()> {
    let buf = timestamp.as_bytes();
    let ts = parse_timestamp(buf, buf.len())
        .with_context(|| format!("failed to parse {timestamp:?}"))?;
    println!(
        "{} {} {} {} {} {:.6}",
        ts.year, ts.month, ts.day, ts.hour, ts.minute, ts.second
    );

    info!("starting {iterations} iterations");
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(parse_timestamp(black_box(buf), buf.len()));
    }
    let elapsed = start.elapsed();

    let per_parse = elapsed.as_nanos() as f64 / iterations.max(1) as f64;
    info!(?elapsed, "done; {per_parse:.1}ns per parse");
    Ok(())
}
