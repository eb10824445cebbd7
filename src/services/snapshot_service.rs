use tracing::debug;

use crate::cache::RateStore;
use crate::models::DashUsdRate;
use crate::utils::RatesError;

/// Read every cached rate
///
/// A single undecodable entry fails the whole read; a partial snapshot is never
/// returned. Order follows the store's key enumeration.
pub async fn collect_all(store: &dyn RateStore) -> Result<Vec<DashUsdRate>, RatesError> {
    let entries = store.list_all().await.map_err(RatesError::StoreReadFailed)?;
    debug!("Read {} cached rates", entries.len());

    entries
        .into_iter()
        .map(|(key, raw)| DashUsdRate::decode(&raw).map_err(|error| RatesError::DecodeFailed { key, error }))
        .collect()
}

/// Render a snapshot as the JSON read response
pub fn render_snapshot(rates: &[DashUsdRate]) -> Result<String, serde_json::Error> {
    serde_json::to_string(rates)
}
