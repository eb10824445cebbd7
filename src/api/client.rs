use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::RETRY_AFTER;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::ApiError;
use crate::models::{Quote, TRACKED_ASSET};

const USER_AGENT: &str = concat!("dashrates-cache/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by every source client
///
/// The timeout is the only bound on a single source's fetch; the fetch cycle
/// itself waits for every source to finish.
pub fn build_http_client(timeout: Duration) -> Result<HttpClient, ApiError> {
    HttpClient::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))
}

/// Base URL of one upstream API plus the shared HTTP client
#[derive(Clone)]
pub struct Endpoint {
    http_client: HttpClient,
    base_url: String,
}

impl Endpoint {
    pub fn new(http_client: HttpClient, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` under the base URL and deserialize the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        get_json(&self.http_client, &self.url(path)).await
    }
}

/// Construction shared by every upstream client
pub trait Upstream: Sized {
    const DEFAULT_BASE_URL: &'static str;

    fn from_endpoint(endpoint: Endpoint) -> Self;

    fn new(http_client: HttpClient) -> Self {
        Self::with_base_url(http_client, Self::DEFAULT_BASE_URL)
    }

    /// Create a client with custom base URL (for testing)
    fn with_base_url(http_client: HttpClient, base_url: &str) -> Self {
        Self::from_endpoint(Endpoint::new(http_client, base_url))
    }
}

/// GET a URL and deserialize the JSON body
pub async fn get_json<T: DeserializeOwned>(http: &HttpClient, url: &str) -> Result<T, ApiError> {
    debug!("GET {}", url);

    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(handle_error_response(status, response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
}

/// Parse error response based on HTTP status code
async fn handle_error_response(status: reqwest::StatusCode, response: reqwest::Response) -> ApiError {
    let status_code = status.as_u16();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok());
    let body_text = response.text().await.unwrap_or_default();

    match status_code {
        400 => ApiError::BadRequest(body_text),
        404 => ApiError::NotFound(body_text),
        429 => {
            warn!("Rate limited, retry after {:?} s", retry_after);
            ApiError::RateLimited { retry_after }
        }
        500..=599 => {
            warn!("Server error {}: {}", status_code, body_text);
            ApiError::ServerError(status_code, body_text)
        }
        _ => ApiError::HttpError(status_code, body_text),
    }
}

/// Parse a numeric field that exchanges deliver as a string
pub fn parse_number(field: &str, raw: &str) -> Result<f64, ApiError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidData(format!("{} is not a number: '{}'", field, raw)))?;

    if !value.is_finite() {
        return Err(ApiError::InvalidData(format!("{} is not finite: '{}'", field, raw)));
    }
    Ok(value)
}

/// Check that a last price is usable
pub fn positive_price(value: f64) -> Result<f64, ApiError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ApiError::InvalidData(format!("last price must be positive, got {}", value)))
    }
}

/// Check that a volume is usable
pub fn non_negative_volume(value: f64) -> Result<f64, ApiError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ApiError::InvalidData(format!("volume must not be negative, got {}", value)))
    }
}

/// Build a validated quote of the tracked asset
pub fn build_quote(
    quote_currency: &str,
    last_price: f64,
    base_asset_volume: f64,
    fetch_time: DateTime<Utc>,
) -> Result<Quote, ApiError> {
    Ok(Quote::new(
        TRACKED_ASSET,
        quote_currency,
        positive_price(last_price)?,
        non_negative_volume(base_asset_volume)?,
        fetch_time,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, serde::Deserialize)]
    struct Ticker {
        last: String,
    }

    fn http() -> HttpClient {
        build_http_client(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("last", " 12.5 ").unwrap(), 12.5);
        assert!(matches!(parse_number("last", "abc"), Err(ApiError::InvalidData(_))));
        assert!(matches!(parse_number("last", "NaN"), Err(ApiError::InvalidData(_))));
        assert!(matches!(parse_number("last", "inf"), Err(ApiError::InvalidData(_))));
    }

    #[test]
    fn test_price_and_volume_checks() {
        assert!(positive_price(0.0).is_err());
        assert!(positive_price(-1.0).is_err());
        assert_eq!(positive_price(0.002).unwrap(), 0.002);
        assert_eq!(non_negative_volume(0.0).unwrap(), 0.0);
        assert!(non_negative_volume(-0.5).is_err());
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ticker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"last": "1.5"})))
            .mount(&server)
            .await;

        let ticker: Ticker = get_json(&http(), &format!("{}/ticker", server.uri())).await.unwrap();
        assert_eq!(ticker.last, "1.5");
    }

    #[tokio::test]
    async fn test_get_json_maps_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
            .mount(&server)
            .await;

        let err = get_json::<Ticker>(&http(), &format!("{}/ticker", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::RateLimited { retry_after: Some(30) });
    }

    #[tokio::test]
    async fn test_get_json_maps_server_error_and_bad_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = get_json::<Ticker>(&http(), &format!("{}/down", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::ServerError(503, "maintenance".to_string()));

        let err = get_json::<Ticker>(&http(), &format!("{}/garbage", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    struct Venue(Endpoint);

    impl Upstream for Venue {
        const DEFAULT_BASE_URL: &'static str = "https://api.example.com/v1";

        fn from_endpoint(endpoint: Endpoint) -> Self {
            Venue(endpoint)
        }
    }

    #[test]
    fn test_upstream_constructors() {
        assert_eq!(Venue::new(http()).0.url("/ticker"), "https://api.example.com/v1/ticker");
        assert_eq!(
            Venue::with_base_url(http(), "http://127.0.0.1:8080/").0.url("/ticker"),
            "http://127.0.0.1:8080/ticker"
        );
    }

    #[tokio::test]
    async fn test_endpoint_keeps_base_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/ticker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"last": "2.5"})))
            .mount(&server)
            .await;

        let endpoint = Endpoint::new(http(), &format!("{}/v2//", server.uri()));
        let ticker: Ticker = endpoint.get_json("/ticker").await.unwrap();
        assert_eq!(ticker.last, "2.5");
    }
}
