//! Raw exchange quotes

use chrono::{DateTime, Utc};

/// Last traded price of the tracked asset on one exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub base_currency: String,
    pub quote_currency: String,
    /// Price of one base unit in the quote currency
    pub last_price: f64,
    /// Traded volume in base units over the exchange's reference window
    pub base_asset_volume: f64,
    pub fetch_time: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        base_currency: &str,
        quote_currency: &str,
        last_price: f64,
        base_asset_volume: f64,
        fetch_time: DateTime<Utc>,
    ) -> Self {
        Self {
            base_currency: base_currency.to_string(),
            quote_currency: quote_currency.to_string(),
            last_price,
            base_asset_volume,
            fetch_time,
        }
    }
}

/// Price of the bridge asset in USD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeQuote {
    pub last_price: f64,
}
