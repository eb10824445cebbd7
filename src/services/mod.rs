pub mod fetch_service;
pub mod rate_service;
pub mod snapshot_service;

pub use fetch_service::FetchCoordinator;
