//! Scoring output: triggers, scored candidates and the persisted selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named, weighted condition that fired for an asset during scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub label: String,
    pub weight: u32,
}

impl Trigger {
    pub fn new(label: impl Into<String>, weight: u32) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

/// One scored asset.
///
/// `score` is always the exact sum of the trigger weights: it is computed in
/// [`ScoredCandidate::new`] and re-checked by [`Selection::validate`] after a
/// round-trip through storage. The baseline price is frozen at scoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    symbol: String,
    score: u32,
    triggers: Vec<Trigger>,
    baseline_price: f64,
}

impl ScoredCandidate {
    pub fn new(symbol: impl Into<String>, triggers: Vec<Trigger>, baseline_price: f64) -> Self {
        let score = triggers.iter().map(|t| t.weight).sum();
        Self {
            symbol: symbol.into(),
            score,
            triggers,
            baseline_price,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Triggers in evaluation order.
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// First trigger that fired, if any.
    pub fn primary_trigger(&self) -> Option<&Trigger> {
        self.triggers.first()
    }

    pub fn secondary_trigger(&self) -> Option<&Trigger> {
        self.triggers.get(1)
    }

    pub fn baseline_price(&self) -> f64 {
        self.baseline_price
    }

    fn weights_consistent(&self) -> bool {
        self.triggers.iter().map(|t| t.weight).sum::<u32>() == self.score
    }
}

/// Integrity failures detected on a deserialized selection.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("fingerprint mismatch: stored {stored}, computed {computed}")]
    FingerprintMismatch { stored: String, computed: String },

    #[error("candidate {symbol}: score {score} does not equal the sum of its trigger weights")]
    ScoreMismatch { symbol: String, score: u32 },

    #[error("selection holds {len} candidates, more than the top-{max} bound")]
    TooManyCandidates { len: usize, max: usize },
}

/// The ranked top-K of one scan, as written to durable storage.
///
/// Every scan replaces the previous selection in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub created_at: DateTime<Utc>,
    /// blake3 hex digest of the canonical JSON of `candidates`.
    pub fingerprint: String,
    pub candidates: Vec<ScoredCandidate>,
}

impl Selection {
    pub fn new(candidates: Vec<ScoredCandidate>, created_at: DateTime<Utc>) -> Self {
        let fingerprint = fingerprint_of(&candidates);
        Self {
            created_at,
            fingerprint,
            candidates,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Check the invariants a selection must hold after deserialization.
    pub fn validate(&self, max_len: usize) -> Result<(), SelectionError> {
        if self.candidates.len() > max_len {
            return Err(SelectionError::TooManyCandidates {
                len: self.candidates.len(),
                max: max_len,
            });
        }
        if let Some(bad) = self.candidates.iter().find(|c| !c.weights_consistent()) {
            return Err(SelectionError::ScoreMismatch {
                symbol: bad.symbol.clone(),
                score: bad.score,
            });
        }
        let computed = fingerprint_of(&self.candidates);
        if computed != self.fingerprint {
            return Err(SelectionError::FingerprintMismatch {
                stored: self.fingerprint.clone(),
                computed,
            });
        }
        Ok(())
    }
}

fn fingerprint_of(candidates: &[ScoredCandidate]) -> String {
    // Struct fields serialize in declaration order, so the JSON is canonical.
    match serde_json::to_vec(candidates) {
        Ok(bytes) => blake3::hash(&bytes).to_hex().to_string(),
        Err(_) => String::new(),
    }
}
