use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::client::{build_quote, parse_number, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, BRIDGE_ASSET};

#[derive(Debug, Deserialize)]
struct Ticker {
    /// Null when the market has not traded
    last: Option<String>,
    volume: String,
}

/// HitBTC v3 ticker for DASH/BTC
pub struct HitBtcApi {
    endpoint: Endpoint,
}

impl HitBtcApi {
    const SYMBOL: &'static str = "DASHBTC";
}

impl Upstream for HitBtcApi {
    const DEFAULT_BASE_URL: &'static str = "https://api.hitbtc.com";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(ticker: Ticker, fetch_time: DateTime<Utc>) -> Result<Quote, ApiError> {
    let last = ticker
        .last
        .ok_or_else(|| ApiError::InvalidData("no last trade".to_string()))?;

    build_quote(
        BRIDGE_ASSET,
        parse_number("last", &last)?,
        parse_number("volume", &ticker.volume)?,
        fetch_time,
    )
}

#[async_trait]
impl RateSource for HitBtcApi {
    fn display_name(&self) -> &str {
        "HitBTC"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let path = format!("/api/3/public/ticker/{}", Self::SYMBOL);
        let ticker: Ticker = self.endpoint.get_json(&path).await?;
        into_quote(ticker, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untraded_market() {
        let ticker: Ticker = serde_json::from_value(serde_json::json!({
            "last": null,
            "volume": "0"
        }))
        .unwrap();

        assert!(matches!(into_quote(ticker, Utc::now()), Err(ApiError::InvalidData(_))));
    }
}
