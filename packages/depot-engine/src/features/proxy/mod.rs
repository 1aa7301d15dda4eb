//! Proxy repositories: remote liveness tracking and fetch-through transport
//!
//! - `RemoteRepositoryStatusRegistry`: URL → ONLINE/OFFLINE/CHECKING/UNKNOWN
//! - `RemoteRepositoryStatusChecker`: bounded-retry probes, cancellable sweep loop
//! - `HttpRemoteResolver`: `RemoteResolver` over reqwest

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{ProxyMetrics, RemoteRepositoryStatusChecker, RemoteRepositoryStatusRegistry};
pub use domain::{RemoteRepositoryStatus, RemoteRepositoryStatusInfo};
pub use infrastructure::{remote_url, HttpRemoteResolver};
pub use ports::RemoteResolver;
