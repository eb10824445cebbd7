//! Data models for quotes and normalized rates
//!
//! A `Quote` is what a source client hands back for one exchange. A `DashUsdRate`
//! is the normalized record that is cached and served.

pub mod quote;
pub mod rate;

pub use quote::{BridgeQuote, Quote};
pub use rate::DashUsdRate;

/// Ticker of the tracked asset
pub const TRACKED_ASSET: &str = "DASH";

/// Ticker of the bridge asset used to convert non-USD quotes
pub const BRIDGE_ASSET: &str = "BTC";

/// Ticker of the common currency
pub const USD: &str = "USD";
