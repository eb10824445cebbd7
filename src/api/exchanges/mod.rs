//! Exchange ticker clients, one per venue

pub mod bigone;
pub mod binance;
pub mod bitfinex;
pub mod cex;
pub mod coinbase;
pub mod exmo;
pub mod hitbtc;
pub mod huobi;
pub mod kraken;
pub mod poloniex;

pub use bigone::BigOneApi;
pub use binance::BinanceApi;
pub use bitfinex::BitfinexApi;
pub use cex::CexApi;
pub use coinbase::CoinbaseApi;
pub use exmo::ExmoApi;
pub use hitbtc::HitBtcApi;
pub use huobi::HuobiApi;
pub use kraken::KrakenApi;
pub use poloniex::PoloniexApi;
