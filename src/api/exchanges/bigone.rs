use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::client::{build_quote, parse_number, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, BRIDGE_ASSET};

#[derive(Debug, Deserialize)]
struct TickerResponse {
    code: i64,
    message: Option<String>,
    data: Option<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    close: String,
    volume: String,
}

/// BigONE v3 ticker for DASH-BTC
pub struct BigOneApi {
    endpoint: Endpoint,
}

impl BigOneApi {
    const PAIR: &'static str = "DASH-BTC";
}

impl Upstream for BigOneApi {
    const DEFAULT_BASE_URL: &'static str = "https://big.one/api/v3";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(response: TickerResponse, fetch_time: DateTime<Utc>) -> Result<Quote, ApiError> {
    let ticker = match (response.code, response.data) {
        (0, Some(ticker)) => ticker,
        (code, _) => {
            return Err(ApiError::InvalidData(format!(
                "code {}: {}",
                code,
                response.message.unwrap_or_default()
            )))
        }
    };

    build_quote(
        BRIDGE_ASSET,
        parse_number("close", &ticker.close)?,
        parse_number("volume", &ticker.volume)?,
        fetch_time,
    )
}

#[async_trait]
impl RateSource for BigOneApi {
    fn display_name(&self) -> &str {
        "BigONE"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let path = format!("/asset_pairs/{}/ticker", Self::PAIR);
        let response: TickerResponse = self.endpoint.get_json(&path).await?;
        into_quote(response, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker() {
        let response: TickerResponse = serde_json::from_value(serde_json::json!({
            "code": 0,
            "data": {"asset_pair_name": "DASH-BTC", "close": "0.0007", "volume": "0"}
        }))
        .unwrap();

        let quote = into_quote(response, Utc::now()).unwrap();
        assert_eq!(quote.last_price, 0.0007);
        assert_eq!(quote.base_asset_volume, 0.0);
    }

    #[test]
    fn test_non_zero_code() {
        let response: TickerResponse = serde_json::from_value(serde_json::json!({
            "code": 10014,
            "message": "asset pair not found"
        }))
        .unwrap();

        assert!(matches!(into_quote(response, Utc::now()), Err(ApiError::InvalidData(_))));
    }
}
