//! Confluence Core: domain types, indicators, signal evaluators, scoring,
//! ranking, reconciliation and collaborator clients.
//!
//! - Indicator library over plain `f64` series (NaN warmup convention)
//! - Thirteen independent weighted evaluators
//! - Scoring engine: score = sum of fired weights, assets scored in parallel
//! - Ranker: stable descending sort, top 5
//! - Reconciler: realized percent change of a stored selection

pub mod data;
pub mod domain;
pub mod evaluators;
pub mod indicators;
pub mod ranking;
pub mod reconcile;
pub mod scoring;

pub use ranking::{rank, TOP_K};
pub use reconcile::{reconcile, TARGET_PERCENT};
pub use scoring::{score_all, score_asset, ScoreError};
