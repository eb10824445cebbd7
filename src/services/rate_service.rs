use crate::models::{DashUsdRate, Quote, BRIDGE_ASSET, TRACKED_ASSET, USD};
use crate::utils::NormalizeError;

/// Convert an exchange quote into a USD rate
///
/// Quotes in the bridge asset are multiplied by the bridge's USD price, USD
/// quotes pass through unchanged. Any other quote currency is rejected rather
/// than passed off as USD. A zero or overflowing USD volume is reported as no
/// volume.
pub fn normalize(
    bridge_rate_usd: f64,
    source_name: &str,
    quote: &Quote,
) -> Result<DashUsdRate, NormalizeError> {
    if quote.base_currency != TRACKED_ASSET {
        return Err(NormalizeError::UnexpectedBaseCurrency(quote.base_currency.clone()));
    }

    let rate_usd = match quote.quote_currency.as_str() {
        BRIDGE_ASSET => quote.last_price * bridge_rate_usd,
        USD => quote.last_price,
        other => return Err(NormalizeError::UnexpectedQuoteCurrency(other.to_string())),
    };

    if !rate_usd.is_finite() || rate_usd <= 0.0 {
        return Err(NormalizeError::InvalidPrice(rate_usd));
    }

    let volume_usd = quote.base_asset_volume * rate_usd;

    Ok(DashUsdRate {
        name: source_name.to_string(),
        rate_usd,
        volume_usd: (volume_usd.is_finite() && volume_usd != 0.0).then_some(volume_usd),
        fetched_at: quote.fetch_time,
    })
}
