//! Proxy domain types

mod status;

pub use status::{RemoteRepositoryStatus, RemoteRepositoryStatusInfo};
