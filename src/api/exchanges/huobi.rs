use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::client::{build_quote, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, BRIDGE_ASSET};

#[derive(Debug, Deserialize)]
struct MergedResponse {
    status: String,
    #[serde(rename = "err-msg")]
    err_msg: Option<String>,
    tick: Option<MergedTick>,
}

#[derive(Debug, Deserialize)]
struct MergedTick {
    close: f64,
    /// Base asset volume (`vol` is quote volume)
    amount: f64,
}

/// Huobi merged market detail for dash/btc
pub struct HuobiApi {
    endpoint: Endpoint,
}

impl HuobiApi {
    const SYMBOL: &'static str = "dashbtc";
}

impl Upstream for HuobiApi {
    const DEFAULT_BASE_URL: &'static str = "https://api.huobi.pro";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(response: MergedResponse, fetch_time: DateTime<Utc>) -> Result<Quote, ApiError> {
    if response.status != "ok" {
        return Err(ApiError::InvalidData(
            response.err_msg.unwrap_or(response.status),
        ));
    }
    let tick = response
        .tick
        .ok_or_else(|| ApiError::InvalidData("missing tick".to_string()))?;

    build_quote(BRIDGE_ASSET, tick.close, tick.amount, fetch_time)
}

#[async_trait]
impl RateSource for HuobiApi {
    fn display_name(&self) -> &str {
        "Huobi"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let path = format!("/market/detail/merged?symbol={}", Self::SYMBOL);
        let response: MergedResponse = self.endpoint.get_json(&path).await?;
        into_quote(response, Utc::now())
    }
}
