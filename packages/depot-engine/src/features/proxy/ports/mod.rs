//! Proxy ports

mod resolver;

pub use resolver::RemoteResolver;
