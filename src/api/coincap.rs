use async_trait::async_trait;
use serde::Deserialize;

use super::client::{parse_number, positive_price, Endpoint, Upstream};
use super::{ApiError, BridgeRateSource};
use crate::models::BridgeQuote;

#[derive(Debug, Deserialize)]
struct AssetResponse {
    data: AssetData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetData {
    price_usd: String,
}

/// CoinCap client for the BTC/USD bridge rate
pub struct CoinCapApi {
    endpoint: Endpoint,
}

impl CoinCapApi {
    const ASSET: &'static str = "bitcoin";
}

impl Upstream for CoinCapApi {
    const DEFAULT_BASE_URL: &'static str = "https://api.coincap.io/v2";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl BridgeRateSource for CoinCapApi {
    async fn fetch_rate(&self) -> Result<BridgeQuote, ApiError> {
        let path = format!("/assets/{}", Self::ASSET);
        let response: AssetResponse = self.endpoint.get_json(&path).await?;
        let last_price = positive_price(parse_number("priceUsd", &response.data.price_usd)?)?;

        Ok(BridgeQuote { last_price })
    }
}
