//! Terminal output for received records and acknowledgment results

use crate::core::styles::StyleRole;
use crate::core::time::encode_timestamp;
use crate::queue::{AckReport, Receipt};
use prettytable::{format, row, Cell, Row, Table};
use std::io::Write;

/// Table of receipts in dequeue order
pub fn receipts_table(receipts: &[Receipt]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["#", "ID", "Timestamp", "Provenance"]);
    for (position, receipt) in receipts.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(position + 1).to_string()).style_spec("r"),
            Cell::new(&receipt.id),
            Cell::new(&encode_timestamp(&receipt.timestamp)),
            Cell::new(&receipt.provenance),
        ]));
    }
    table
}

/// Summary line per outcome class, then one line per conflict and failure
pub fn write_ack_report<W: Write + ?Sized>(
    out: &mut W,
    report: &AckReport,
    color: bool,
) -> std::io::Result<()> {
    let acknowledged = report.acknowledged().len();
    let conflicts = report.conflicts();
    let failures = report.failures();

    writeln!(
        out,
        "{} {} of {}",
        StyleRole::Acknowledged.paint("Acknowledged:", color),
        acknowledged,
        report.len()
    )?;

    if !conflicts.is_empty() {
        writeln!(
            out,
            "{} {} (changed since it was received)",
            StyleRole::Conflict.paint("Conflicts:", color),
            conflicts.len()
        )?;
        for receipt in conflicts {
            writeln!(out, "  {}", StyleRole::Key.paint(&receipt.id, color))?;
        }
    }

    if !failures.is_empty() {
        writeln!(
            out,
            "{} {}",
            StyleRole::Error.paint("Failed:", color),
            failures.len()
        )?;
        for (receipt, error) in failures {
            writeln!(
                out,
                "  {}: {}",
                StyleRole::Key.paint(&receipt.id, color),
                StyleRole::Dim.paint(&error.to_string(), color)
            )?;
        }
    }
    Ok(())
}
