//! Normalized USD rate, the unit of the cache and of the read response

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One exchange's DASH price expressed in USD
///
/// The JSON form is both the cached value and an element of the read response:
/// `{"exchange": .., "price": .., "volume": .., "fetchedAt": ..}` with `volume`
/// omitted when there is no volume data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashUsdRate {
    #[serde(rename = "exchange")]
    pub name: String,
    #[serde(rename = "price")]
    pub rate_usd: f64,
    #[serde(rename = "volume", default, skip_serializing_if = "Option::is_none")]
    pub volume_usd: Option<f64>,
    #[serde(rename = "fetchedAt")]
    pub fetched_at: DateTime<Utc>,
}

impl DashUsdRate {
    /// Encode into the raw cache representation
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from the raw cache representation
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
