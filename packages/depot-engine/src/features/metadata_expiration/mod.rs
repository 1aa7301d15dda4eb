//! Proxy metadata expiration
//!
//! Decides whether metadata fetched earlier from a remote (version indexes,
//! package documents) may be served again or must be re-fetched.
//!
//! | Strategy | USABLE | EXPIRED | UNDECIDED |
//! |----------|--------|---------|-----------|
//! | checksum | local sidecar == remote sidecar | sidecars differ | no baseline / remote unavailable |
//! | refresh  | never | always | never |

pub mod application;
pub mod domain;
pub mod ports;

pub use application::{
    ChecksumMetadataExpirationStrategy, ProxyMetadataRefresher, RefreshMetadataExpirationStrategy,
};
pub use domain::{normalize_checksum, ChecksumAlgorithm, Decision, RefreshOutcome};
pub use ports::MetadataExpirationStrategy;
