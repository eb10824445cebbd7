use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod cache;
mod config;
mod models;
mod services;
mod utils;

use api::{CoinCapApi, Upstream};
use cache::{RateStore, RedisStore};
use config::Config;
use services::{snapshot_service, FetchCoordinator};
use utils::RatesError;

const USAGE: &str = "usage: dashrates-cache [fetch|serve|daemon]";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// Run one fetch cycle
    Fetch,
    /// Print the cached snapshot as JSON
    Serve,
    /// Run a fetch cycle every FETCH_INTERVAL_SECS until interrupted
    Daemon,
}

impl Mode {
    fn parse(arg: Option<&str>) -> Option<Self> {
        match arg {
            None | Some("fetch") => Some(Mode::Fetch),
            Some("serve") => Some(Mode::Serve),
            Some("daemon") => Some(Mode::Daemon),
            Some(_) => None,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dashrates_cache=debug,redis=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let Some(mode) = Mode::parse(std::env::args().nth(1).as_deref()) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    // Fail fast on missing config, before any network call
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let result = match mode {
        Mode::Fetch => run_fetch(&config).await,
        Mode::Serve => run_serve(&config).await,
        Mode::Daemon => run_daemon(&config).await,
    };

    if let Err(e) = result {
        error!("{:?} failed: {}", mode, e);
        std::process::exit(1);
    }
}

async fn connect_store(config: &Config) -> Result<Arc<RedisStore>, RatesError> {
    let store = RedisStore::connect(&config.redis_url, &config.key_prefix)
        .await
        .map_err(|e| RatesError::StoreUnreachable(format!("{}: {}", config.redis_url, e)))?;
    Ok(Arc::new(store))
}

fn build_coordinator(config: &Config, store: Arc<dyn RateStore>) -> Result<FetchCoordinator, RatesError> {
    let http = api::build_http_client(config.http_timeout).map_err(RatesError::HttpClientSetup)?;

    Ok(FetchCoordinator::new(
        store,
        Arc::new(CoinCapApi::new(http.clone())),
        api::all_sources(&http),
        config.rate_ttl,
    ))
}

async fn run_fetch(config: &Config) -> Result<(), RatesError> {
    let store = connect_store(config).await?;
    let coordinator = build_coordinator(config, store)?;

    let summary = coordinator.run().await?;
    info!("...done! stored: {:?}, failed: {:?}", summary.stored, summary.failed);
    Ok(())
}

async fn run_serve(config: &Config) -> Result<(), RatesError> {
    let store = connect_store(config).await?;
    store
        .ping()
        .await
        .map_err(|e| RatesError::StoreUnreachable(e.to_string()))?;

    let rates = snapshot_service::collect_all(store.as_ref()).await?;
    let body = snapshot_service::render_snapshot(&rates).map_err(RatesError::SnapshotEncodeFailed)?;
    println!("{}", body);
    Ok(())
}

async fn run_daemon(config: &Config) -> Result<(), RatesError> {
    let store = connect_store(config).await?;
    let coordinator = build_coordinator(config, store)?;

    info!("Fetching rates every {:?}", config.fetch_interval);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for shutdown signal: {}", e);
        }
    };
    coordinator.run_every(config.fetch_interval, shutdown).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse(None), Some(Mode::Fetch));
        assert_eq!(Mode::parse(Some("fetch")), Some(Mode::Fetch));
        assert_eq!(Mode::parse(Some("serve")), Some(Mode::Serve));
        assert_eq!(Mode::parse(Some("daemon")), Some(Mode::Daemon));
        assert_eq!(Mode::parse(Some("--help")), None);
    }
}
