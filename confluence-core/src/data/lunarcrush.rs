//! LunarCrush social scores (`galaxy_score`, 0-100).

use serde::Deserialize;
use std::collections::HashMap;

use super::http::HttpClient;
use super::provider::{ProviderError, SentimentSource};

pub const DEFAULT_URL: &str = "https://lunarcrush.com/api4";

#[derive(Debug, Deserialize)]
pub struct CoinList {
    #[serde(default)]
    pub data: Vec<CoinRow>,
}

#[derive(Debug, Deserialize)]
pub struct CoinRow {
    pub symbol: String,
    #[serde(default)]
    pub galaxy_score: Option<f64>,
}

pub struct LunarCrushSource {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl LunarCrushSource {
    pub fn new(http: HttpClient, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

impl SentimentSource for LunarCrushSource {
    fn social_scores(&self) -> Result<HashMap<String, f64>, ProviderError> {
        let url = format!("{}/public/coins/list/v1", self.base_url);
        let headers = [("Authorization", format!("Bearer {}", self.api_key))];
        let list: CoinList = self.http.get_json(&url, &[], &headers)?;
        Ok(scores_from_list(list))
    }
}

/// Upper-case symbol → score. Rows without a finite score are dropped.
pub fn scores_from_list(list: CoinList) -> HashMap<String, f64> {
    list.data
        .into_iter()
        .filter_map(|row| {
            let score = row.galaxy_score.filter(|s| s.is_finite())?;
            Some((row.symbol.to_uppercase(), score))
        })
        .collect()
}
