use thiserror::Error;

use crate::api::ApiError;
use crate::cache::StoreError;

/// Errors raised while turning an exchange quote into a USD rate
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Unexpected base currency: {0}")]
    UnexpectedBaseCurrency(String),
    #[error("Unexpected quote currency: {0}")]
    UnexpectedQuoteCurrency(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),
}

/// Top-level errors for the fetch cycle and the snapshot read
///
/// Config, liveness and bridge errors abort a whole cycle. Source, normalization
/// and write errors are contained to the unit that raised them. Every read-side
/// error aborts the read.
#[derive(Debug, Error)]
pub enum RatesError {
    #[error("Required config value not set: {0}")]
    ConfigMissing(String),
    #[error("Invalid value '{value}' for config {key}")]
    ConfigInvalid { key: String, value: String },
    #[error("HTTP client setup failed: {0}")]
    HttpClientSetup(ApiError),
    #[error("Unable to reach cache store: {0}")]
    StoreUnreachable(String),
    #[error("Bridge rate fetch failed: {0}")]
    BridgeFetchFailed(ApiError),
    #[error("Fetch from {source_name} failed: {error}")]
    SourceFetchFailed { source_name: String, error: ApiError },
    #[error("Normalization for {source_name} failed: {error}")]
    NormalizationFailed {
        source_name: String,
        error: NormalizeError,
    },
    #[error("Cache write for {key} failed: {error}")]
    StoreWriteFailed { key: String, error: StoreError },
    #[error("Cache read failed: {0}")]
    StoreReadFailed(StoreError),
    #[error("Failed to decode cached rate {key}: {error}")]
    DecodeFailed {
        key: String,
        error: serde_json::Error,
    },
    #[error("Failed to encode snapshot: {0}")]
    SnapshotEncodeFailed(serde_json::Error),
}
