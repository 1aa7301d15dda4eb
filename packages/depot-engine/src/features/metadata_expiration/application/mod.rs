//! Metadata expiration use cases

mod refresher;
mod strategies;

pub use refresher::ProxyMetadataRefresher;
pub use strategies::{ChecksumMetadataExpirationStrategy, RefreshMetadataExpirationStrategy};
