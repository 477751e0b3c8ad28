//! Presentation of ranked records.

use anyhow::{Context, Result};
use std::io::Write;

use crate::pipeline::Inbox;
use crate::{FrequencyRecord, OutputFormat};

/// Write one record in `format`.
pub fn write_record<W: Write>(w: &mut W, record: &FrequencyRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(w, "  {} {}", record.count, record.word)?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *w, record).context("serialize record")?;
            writeln!(w)?;
        }
    }
    Ok(())
}

/// Sink stage body: write every record until the input closes, then flush. Returns records written.
pub fn write_records<W: Write>(
    input: &Inbox<FrequencyRecord>,
    w: &mut W,
    format: OutputFormat,
) -> Result<usize> {
    let mut written = 0_usize;
    while let Some(record) = input.recv()? {
        write_record(w, &record, format)?;
        written += 1;
    }
    w.flush().context("flush output")?;
    Ok(written)
}
