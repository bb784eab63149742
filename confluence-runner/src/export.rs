//! CSV export of reconciliation rows.
//!
//! Columns: symbol, baseline_price, current_price, percent_change,
//! target_met, status, reason. Failed rows leave the price columns empty.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use confluence_core::domain::{format_percent, ReconciliationRow, RowOutcome};

pub fn export_reconciliation_csv(rows: &[ReconciliationRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "symbol",
        "baseline_price",
        "current_price",
        "percent_change",
        "target_met",
        "status",
        "reason",
    ])?;

    for row in rows {
        let baseline = row.baseline_price.to_string();
        match &row.outcome {
            RowOutcome::Priced {
                current_price,
                percent_change,
                target_met,
            } => wtr.write_record([
                row.symbol.as_str(),
                &baseline,
                &current_price.to_string(),
                &format_percent(*percent_change),
                &target_met.to_string(),
                "priced",
                "",
            ])?,
            RowOutcome::Failed { reason } => wtr.write_record([
                row.symbol.as_str(),
                &baseline,
                "",
                "",
                "false",
                "failed",
                reason.as_str(),
            ])?,
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write the rows to `path`, creating parent directories.
pub fn write_reconciliation_csv(path: &Path, rows: &[ReconciliationRow]) -> Result<()> {
    let csv = export_reconciliation_csv(rows)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}
