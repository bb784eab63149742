//! Ranker & selector: bounded, stably sorted top-K by score.
//!
//! Ties keep their scan order, so identical inputs always produce the same
//! selection even when scoring ran in parallel.

use chrono::{DateTime, Utc};

use crate::domain::{ScoredCandidate, Selection};

/// Number of candidates kept in a selection.
pub const TOP_K: usize = 5;

/// Sort descending by score (stable) and keep the first `k`.
pub fn top_k(mut candidates: Vec<ScoredCandidate>, k: usize) -> Vec<ScoredCandidate> {
    // `sort_by` is stable: equal scores keep their input order.
    candidates.sort_by(|a, b| b.score().cmp(&a.score()));
    candidates.truncate(k);
    candidates
}

/// Rank scored candidates into the persisted top-[`TOP_K`] selection.
///
/// Baseline prices are carried over unchanged from scoring time.
pub fn rank(candidates: Vec<ScoredCandidate>, created_at: DateTime<Utc>) -> Selection {
    Selection::new(top_k(candidates, TOP_K), created_at)
}
