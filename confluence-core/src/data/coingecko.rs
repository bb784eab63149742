//! CoinGecko market-cap universe and stablecoin category.

use serde::Deserialize;
use std::collections::HashSet;

use super::http::HttpClient;
use super::provider::{ProviderError, UniverseSource};
use crate::domain::UniverseAsset;

pub const DEFAULT_URL: &str = "https://api.coingecko.com/api/v3";

/// Venue cap on rows per page.
const MAX_PER_PAGE: usize = 250;

#[derive(Debug, Deserialize)]
pub struct MarketRow {
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

pub struct CoinGeckoSource {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoSource {
    pub fn new(http: HttpClient, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn markets(
        &self,
        extra: &[(&str, String)],
        per_page: usize,
    ) -> Result<Vec<MarketRow>, ProviderError> {
        let url = format!("{}/coins/markets", self.base_url);
        let mut query = vec![
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", per_page.clamp(1, MAX_PER_PAGE).to_string()),
            ("page", "1".to_string()),
        ];
        query.extend(extra.iter().cloned());
        let headers: Vec<(&str, String)> = self
            .api_key
            .iter()
            .map(|key| ("x-cg-demo-api-key", key.clone()))
            .collect();
        self.http.get_json(&url, &query, &headers)
    }
}

impl UniverseSource for CoinGeckoSource {
    fn ranked_assets(&self, limit: usize) -> Result<Vec<UniverseAsset>, ProviderError> {
        Ok(universe_from_rows(self.markets(&[], limit)?, limit))
    }

    fn stablecoins(&self) -> Result<HashSet<String>, ProviderError> {
        let rows = self.markets(&[("category", "stablecoins".to_string())], MAX_PER_PAGE)?;
        Ok(rows.into_iter().map(|row| row.symbol.to_uppercase()).collect())
    }
}

/// Rows to a rank-ordered universe. Unranked rows sort last; duplicate
/// symbols keep their best rank.
pub fn universe_from_rows(rows: Vec<MarketRow>, limit: usize) -> Vec<UniverseAsset> {
    let mut ranked: Vec<(u32, String)> = rows
        .into_iter()
        .map(|row| (row.market_cap_rank.unwrap_or(u32::MAX), row.symbol))
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);

    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter_map(|(rank, symbol)| {
            let asset = UniverseAsset::new(symbol, rank);
            seen.insert(asset.symbol.clone()).then_some(asset)
        })
        .take(limit)
        .collect()
}
