//! Outcome reconciler: compares each picked symbol's baseline with its
//! current price.
//!
//! One row per candidate, in selection order. A failed lookup only affects
//! its own row.

use tracing::debug;

use crate::data::PriceLookup;
use crate::domain::{ReconciliationRow, RowOutcome, Selection};

/// Percent gain at which a pick counts as a success.
pub const TARGET_PERCENT: f64 = 10.0;

/// Signed percent change from `baseline` to `current`.
///
/// Evaluated as `(current - baseline) / baseline * 100`; the operation order
/// decides which side of the target a price exactly at +10% lands on.
pub fn percent_change(baseline: f64, current: f64) -> f64 {
    (current - baseline) / baseline * 100.0
}

/// Reconcile every candidate of a stored selection against live prices.
///
/// Read-only with respect to the selection: running it twice against the
/// same prices yields the same rows.
pub fn reconcile(selection: &Selection, lookup: &dyn PriceLookup) -> Vec<ReconciliationRow> {
    selection
        .candidates
        .iter()
        .map(|candidate| {
            let symbol = candidate.symbol();
            let baseline = candidate.baseline_price();
            let outcome = price_outcome(symbol, baseline, lookup);
            debug!(symbol, baseline, ?outcome, "reconciled");
            ReconciliationRow {
                symbol: symbol.to_string(),
                baseline_price: baseline,
                outcome,
            }
        })
        .collect()
}

fn price_outcome(symbol: &str, baseline: f64, lookup: &dyn PriceLookup) -> RowOutcome {
    if !baseline.is_finite() || baseline <= 0.0 {
        return RowOutcome::Failed {
            reason: format!("unusable baseline price {baseline}"),
        };
    }
    match lookup.current_price(symbol) {
        Ok(current) if current.is_finite() && current > 0.0 => {
            let change = percent_change(baseline, current);
            RowOutcome::Priced {
                current_price: current,
                percent_change: change,
                target_met: change >= TARGET_PERCENT,
            }
        }
        Ok(current) => RowOutcome::Failed {
            reason: format!("unusable current price {current}"),
        },
        Err(e) => RowOutcome::Failed {
            reason: e.to_string(),
        },
    }
}
