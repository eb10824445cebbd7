use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::client::{build_quote, parse_number, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, BRIDGE_ASSET};

#[derive(Debug, Deserialize)]
struct PairTicker {
    last_trade: String,
    vol: String,
}

/// Exmo ticker for DASH/BTC
///
/// Exmo only offers the ticker for all pairs at once.
pub struct ExmoApi {
    endpoint: Endpoint,
}

impl ExmoApi {
    const PAIR: &'static str = "DASH_BTC";
}

impl Upstream for ExmoApi {
    const DEFAULT_BASE_URL: &'static str = "https://api.exmo.com";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(
    mut tickers: HashMap<String, PairTicker>,
    pair: &str,
    fetch_time: DateTime<Utc>,
) -> Result<Quote, ApiError> {
    let ticker = tickers
        .remove(pair)
        .ok_or_else(|| ApiError::InvalidData(format!("pair {} not listed", pair)))?;

    build_quote(
        BRIDGE_ASSET,
        parse_number("last_trade", &ticker.last_trade)?,
        parse_number("vol", &ticker.vol)?,
        fetch_time,
    )
}

#[async_trait]
impl RateSource for ExmoApi {
    fn display_name(&self) -> &str {
        "Exmo"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let tickers: HashMap<String, PairTicker> = self.endpoint.get_json("/v1.1/ticker").await?;
        into_quote(tickers, Self::PAIR, Utc::now())
    }
}
