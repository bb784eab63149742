//! Confluence runner: scan and reconciliation cycles around `confluence-core`.
//!
//! This crate provides:
//! - TOML configuration with env-var secrets
//! - External signal gathering with per-source fallback
//! - The scan cycle (universe, market data, scoring, top-K, persist, notify)
//! - The reconciliation cycle and its CSV export
//! - Atomic JSON selection store and best-effort notification sinks

pub mod config;
pub mod export;
pub mod live;
pub mod notify;
pub mod reconciliation;
pub mod scan;
pub mod signals;
pub mod store;

pub use config::{env_secret, AppConfig, ConfigError};
pub use export::{export_reconciliation_csv, write_reconciliation_csv};
pub use live::LiveServices;
pub use notify::{
    deliver, reconciliation_message, selection_message, FanoutSink, NotificationSink,
    NotifyError, StdoutSink, WebhookSink,
};
pub use reconciliation::{run_reconciliation, ReconciliationReport};
pub use scan::{
    run_scan_cycle, CycleError, CycleOptions, ScanCycle, ScanError, ScanOptions, ScanReport,
    Scanner, SkipReason, SkippedAsset,
};
pub use signals::{gather_signals, SignalSources, DEFAULT_STABLECOINS};
pub use store::{JsonFileStore, SelectionStore, StoreError};
