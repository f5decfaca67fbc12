//! Console output: the report as indented JSON.

use crate::report::Report;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// Write the report as JSON with four-space indentation and a final newline.
pub fn render<W: Write>(report: &Report, mut out: W) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    report
        .serialize(&mut serializer)
        .context("Failed to serialize report")?;
    writeln!(out).context("Failed to write report")?;
    out.flush().context("Failed to flush output")?;
    Ok(())
}
