//! Notification sinks and the messages sent to them.
//!
//! Delivery is best-effort: callers go through [`deliver`], which logs a
//! failed notification and moves on.

use std::io::Write;

use thiserror::Error;
use tracing::warn;

use confluence_core::data::{HttpClient, ProviderError};
use confluence_core::domain::{ReconciliationRow, Selection};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("stdout: {0}")]
    Stdout(#[from] std::io::Error),

    #[error("webhook: {0}")]
    Webhook(#[from] ProviderError),

    #[error("{failed} of {total} sinks failed")]
    Fanout { failed: usize, total: usize },
}

pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Send `message`, logging instead of propagating a failure.
pub fn deliver(sink: &dyn NotificationSink, message: &str) -> bool {
    match sink.notify(message) {
        Ok(()) => true,
        Err(e) => {
            warn!(sink = sink.name(), error = %e, "notification failed");
            false
        }
    }
}

pub struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{message}")?;
        out.flush()?;
        Ok(())
    }
}

/// Posts `{"content": message}`, the body Discord-style chat webhooks accept.
pub struct WebhookSink {
    http: HttpClient,
    url: String,
}

impl WebhookSink {
    pub fn new(http: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

impl NotificationSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let body = serde_json::json!({ "content": message });
        self.http.post_json(&self.url, &body)?;
        Ok(())
    }
}

/// Delivers to every inner sink; fails only when all of them fail.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Box<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl NotificationSink for FanoutSink {
    fn name(&self) -> &str {
        "fanout"
    }

    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let failed = self
            .sinks
            .iter()
            .filter(|sink| !deliver(sink.as_ref(), message))
            .count();
        if failed > 0 && failed == self.sinks.len() {
            return Err(NotifyError::Fanout {
                failed,
                total: self.sinks.len(),
            });
        }
        Ok(())
    }
}

/// Top-K summary: rank, symbol, score, primary and secondary trigger.
pub fn selection_message(selection: &Selection) -> String {
    if selection.is_empty() {
        return format!(
            "Scan {}: no candidates scored",
            selection.created_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    let mut lines = vec![format!(
        "Top {} picks ({})",
        selection.len(),
        selection.created_at.format("%Y-%m-%d %H:%M UTC")
    )];
    for (i, candidate) in selection.candidates.iter().enumerate() {
        let reasons: Vec<&str> = [candidate.primary_trigger(), candidate.secondary_trigger()]
            .into_iter()
            .flatten()
            .map(|t| t.label.as_str())
            .collect();
        let reasons = if reasons.is_empty() {
            "no triggers".to_string()
        } else {
            reasons.join(", ")
        };
        lines.push(format!(
            "{}. {} score {} @ {} | {}",
            i + 1,
            candidate.symbol(),
            candidate.score(),
            candidate.baseline_price(),
            reasons
        ));
    }
    lines.join("\n")
}

/// One line per reconciled symbol plus a hit count.
pub fn reconciliation_message(rows: &[ReconciliationRow]) -> String {
    let hits = rows.iter().filter(|r| r.target_met()).count();
    let failed = rows.iter().filter(|r| r.is_failed()).count();
    let mut lines = vec![format!(
        "Reconciliation: {hits}/{} hit target, {failed} failed lookups",
        rows.len()
    )];
    lines.extend(rows.iter().map(|row| row.to_string()));
    lines.join("\n")
}
