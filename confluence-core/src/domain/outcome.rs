//! Reconciliation rows: realized change of each picked asset.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of reconciling one picked symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Priced {
        current_price: f64,
        /// Signed percent change from the baseline (12.0 = +12%).
        percent_change: f64,
        target_met: bool,
    },
    Failed {
        reason: String,
    },
}

/// One reconciliation line per picked symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRow {
    pub symbol: String,
    pub baseline_price: f64,
    pub outcome: RowOutcome,
}

impl ReconciliationRow {
    pub fn percent_change(&self) -> Option<f64> {
        match self.outcome {
            RowOutcome::Priced { percent_change, .. } => Some(percent_change),
            RowOutcome::Failed { .. } => None,
        }
    }

    pub fn target_met(&self) -> bool {
        matches!(self.outcome, RowOutcome::Priced { target_met: true, .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, RowOutcome::Failed { .. })
    }
}

impl fmt::Display for ReconciliationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            RowOutcome::Priced {
                current_price,
                percent_change,
                target_met,
            } => {
                let verdict = if *target_met { "target met" } else { "target missed" };
                write!(
                    f,
                    "{}: {} -> {} ({}) {verdict}",
                    self.symbol,
                    self.baseline_price,
                    current_price,
                    format_percent(*percent_change),
                )
            }
            RowOutcome::Failed { reason } => {
                write!(f, "{}: price lookup failed ({reason})", self.symbol)
            }
        }
    }
}

/// Signed, two-decimal percent string: `+12.00%`, `-3.50%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:+.2}%")
}
