//! Proxy use cases

mod metrics;
mod status_checker;
mod status_registry;

pub use metrics::ProxyMetrics;
pub use status_checker::RemoteRepositoryStatusChecker;
pub use status_registry::RemoteRepositoryStatusRegistry;
