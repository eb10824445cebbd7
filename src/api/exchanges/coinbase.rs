use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::client::{build_quote, parse_number, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, USD};

#[derive(Debug, Deserialize)]
struct ProductTicker {
    price: String,
    volume: String,
}

/// Coinbase Exchange product ticker for DASH-USD
pub struct CoinbaseApi {
    endpoint: Endpoint,
}

impl CoinbaseApi {
    const PRODUCT: &'static str = "DASH-USD";
}

impl Upstream for CoinbaseApi {
    const DEFAULT_BASE_URL: &'static str = "https://api.exchange.coinbase.com";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(ticker: ProductTicker, fetch_time: DateTime<Utc>) -> Result<Quote, ApiError> {
    build_quote(
        USD,
        parse_number("price", &ticker.price)?,
        parse_number("volume", &ticker.volume)?,
        fetch_time,
    )
}

#[async_trait]
impl RateSource for CoinbaseApi {
    fn display_name(&self) -> &str {
        "Coinbase Pro"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let path = format!("/products/{}/ticker", Self::PRODUCT);
        let ticker: ProductTicker = self.endpoint.get_json(&path).await?;
        into_quote(ticker, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_http_client;
    use std::time::Duration;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_rate_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/DASH-USD/ticker"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "trade_id": 123,
                "price": "34.87",
                "size": "1.2",
                "volume": "951.34"
            })))
            .mount(&server)
            .await;

        let http = build_http_client(Duration::from_secs(5)).unwrap();
        let quote = CoinbaseApi::with_base_url(http, &server.uri())
            .fetch_rate()
            .await
            .unwrap();

        assert_eq!(quote.quote_currency, USD);
        assert_eq!(quote.last_price, 34.87);
        assert_eq!(quote.base_asset_volume, 951.34);
    }
}
