//! Whale Alert large-transfer feed.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::http::HttpClient;
use super::provider::{ProviderError, TransferFeed};
use crate::domain::{DestinationType, TransferEvent};

pub const DEFAULT_URL: &str = "https://api.whale-alert.io/v1";

/// Smallest transfer (USD) the feed reports by default.
pub const DEFAULT_MIN_VALUE_USD: u64 = 500_000;

#[derive(Debug, Deserialize)]
pub struct TransactionsResponse {
    pub result: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
pub struct Transaction {
    pub symbol: String,
    pub to: Endpoint,
}

#[derive(Debug, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub owner_type: String,
}

pub struct WhaleAlertFeed {
    http: HttpClient,
    base_url: String,
    api_key: String,
    min_value_usd: u64,
}

impl WhaleAlertFeed {
    pub fn new(
        http: HttpClient,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        min_value_usd: u64,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            min_value_usd,
        }
    }
}

impl TransferFeed for WhaleAlertFeed {
    fn recent_transfers(&self, since: DateTime<Utc>) -> Result<Vec<TransferEvent>, ProviderError> {
        let url = format!("{}/transactions", self.base_url);
        let query = [
            ("api_key", self.api_key.clone()),
            ("start", since.timestamp().to_string()),
            ("min_value", self.min_value_usd.to_string()),
        ];
        let response: TransactionsResponse = self.http.get_json(&url, &query, &[])?;
        events_from_response(response)
    }
}

pub fn events_from_response(
    response: TransactionsResponse,
) -> Result<Vec<TransferEvent>, ProviderError> {
    if response.result != "success" {
        return Err(ProviderError::Other(format!(
            "whale alert: {}",
            response.message.unwrap_or(response.result)
        )));
    }
    Ok(response
        .transactions
        .into_iter()
        .map(|tx| TransferEvent {
            symbol: tx.symbol.to_uppercase(),
            destination: DestinationType::classify(&tx.to.owner_type),
        })
        .collect())
}
