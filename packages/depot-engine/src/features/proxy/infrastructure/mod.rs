//! Proxy infrastructure

mod http_resolver;

pub use http_resolver::{remote_url, HttpRemoteResolver};
