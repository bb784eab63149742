//! Reconciliation cycle: read the stored selection, price it, report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use confluence_core::data::PriceLookup;
use confluence_core::domain::ReconciliationRow;
use confluence_core::reconcile;

use crate::notify::{deliver, reconciliation_message, NotificationSink};
use crate::store::{SelectionStore, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// When the reconciled selection was made; `None` when nothing was stored.
    pub selection_created_at: Option<DateTime<Utc>>,
    pub rows: Vec<ReconciliationRow>,
}

impl ReconciliationReport {
    /// True when there was no selection to reconcile.
    pub fn is_noop(&self) -> bool {
        self.selection_created_at.is_none()
    }

    pub fn hits(&self) -> usize {
        self.rows.iter().filter(|r| r.target_met()).count()
    }

    pub fn failures(&self) -> usize {
        self.rows.iter().filter(|r| r.is_failed()).count()
    }
}

/// Reconcile the stored selection against current prices.
///
/// No stored selection is a no-op, not an error. Per-symbol lookup failures
/// become failed rows. The stored selection is left untouched.
pub fn run_reconciliation(
    store: &dyn SelectionStore,
    lookup: &dyn PriceLookup,
    sink: &dyn NotificationSink,
) -> Result<ReconciliationReport, StoreError> {
    let Some(selection) = store.read_selection()? else {
        info!("no stored selection, nothing to reconcile");
        return Ok(ReconciliationReport::default());
    };

    let rows = reconcile(&selection, lookup);
    let report = ReconciliationReport {
        selection_created_at: Some(selection.created_at),
        rows,
    };
    info!(
        picks = report.rows.len(),
        hits = report.hits(),
        failures = report.failures(),
        "reconciliation complete"
    );
    if !report.rows.is_empty() {
        deliver(sink, &reconciliation_message(&report.rows));
    }
    Ok(report)
}
