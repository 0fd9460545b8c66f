//! Text and JSON renderings of benchmark timings.

use std::io::{self, Write};
use std::time::Duration;

use crate::tally::Tally;

pub fn write_round<W: Write>(out: &mut W, round: usize, name: &str, elapsed: Duration) -> io::Result<()> {
    writeln!(out, "{} {} = {:.2}", round, name, elapsed.as_secs_f64())
}

/// A blank separator line, then `name total` per strategy.
pub fn write_totals<W: Write>(out: &mut W, tally: &Tally) -> io::Result<()> {
    writeln!(out)?;
    for entry in tally.iter() {
        writeln!(out, "{} {:5.2}", entry.name, entry.total().as_secs_f64())?;
    }
    Ok(())
}

/// One JSON object per strategy, one per line.
pub fn write_json<W: Write>(out: &mut W, tally: &Tally) -> io::Result<()> {
    for summary in tally.summaries() {
        serde_json::to_writer(&mut *out, &summary)?;
        writeln!(out)?;
    }
    Ok(())
}
