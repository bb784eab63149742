//! alternative.me Fear & Greed index.

use serde::Deserialize;

use super::http::HttpClient;
use super::provider::{FearGreedSource, ProviderError};

pub const DEFAULT_URL: &str = "https://api.alternative.me";

#[derive(Debug, Deserialize)]
pub struct FngResponse {
    #[serde(default)]
    pub data: Vec<FngPoint>,
}

#[derive(Debug, Deserialize)]
pub struct FngPoint {
    pub value: String,
    #[serde(default)]
    pub value_classification: Option<String>,
}

pub struct AlternativeMeSource {
    http: HttpClient,
    base_url: String,
}

impl AlternativeMeSource {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl FearGreedSource for AlternativeMeSource {
    fn index(&self) -> Result<u8, ProviderError> {
        let url = format!("{}/fng/", self.base_url);
        let response: FngResponse = self.http.get_json(&url, &[("limit", "1".to_string())], &[])?;
        index_from_response(response)
    }
}

/// Newest index value, validated to 0-100.
pub fn index_from_response(response: FngResponse) -> Result<u8, ProviderError> {
    let point = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ResponseFormatChanged("fear/greed: empty data".into()))?;
    point
        .value
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| {
            ProviderError::ResponseFormatChanged(format!("fear/greed value {:?}", point.value))
        })
}
