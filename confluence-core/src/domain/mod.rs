//! Domain types for confluence

pub mod asset;
pub mod candidate;
pub mod candle;
pub mod outcome;
pub mod signals;

pub use asset::{AssetContext, UniverseAsset, DAILY_WINDOW, HOURLY_WINDOW};
pub use candidate::{ScoredCandidate, Selection, SelectionError, Trigger};
pub use candle::{Candle, Interval};
pub use outcome::{format_percent, ReconciliationRow, RowOutcome};
pub use signals::{DestinationType, ExternalSignals, Lookup, TransferEvent};
