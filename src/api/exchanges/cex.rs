use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::client::{build_quote, parse_number, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, USD};

/// CEX.IO answers 200 with an `error` field for unknown pairs
#[derive(Debug, Deserialize)]
struct Ticker {
    error: Option<String>,
    last: Option<String>,
    volume: Option<String>,
}

/// CEX.IO ticker for DASH/USD
pub struct CexApi {
    endpoint: Endpoint,
}

impl CexApi {
    const PAIR: &'static str = "DASH/USD";
}

impl Upstream for CexApi {
    const DEFAULT_BASE_URL: &'static str = "https://cex.io";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(ticker: Ticker, fetch_time: DateTime<Utc>) -> Result<Quote, ApiError> {
    if let Some(error) = ticker.error {
        return Err(ApiError::InvalidData(error));
    }
    match (ticker.last, ticker.volume) {
        (Some(last), Some(volume)) => build_quote(
            USD,
            parse_number("last", &last)?,
            parse_number("volume", &volume)?,
            fetch_time,
        ),
        _ => Err(ApiError::InvalidData("missing last or volume".to_string())),
    }
}

#[async_trait]
impl RateSource for CexApi {
    fn display_name(&self) -> &str {
        "CEX.IO"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let path = format!("/api/ticker/{}", Self::PAIR);
        let ticker: Ticker = self.endpoint.get_json(&path).await?;
        into_quote(ticker, Utc::now())
    }
}
