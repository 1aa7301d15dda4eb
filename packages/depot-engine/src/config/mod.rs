//! Engine configuration
//!
//! ```rust,ignore
//! use depot_engine::config::EngineConfig;
//!
//! // Defaults: 3 probes, 5s timeouts, 60s sweeps, 10 conflict retries
//! let config = EngineConfig::default();
//!
//! // From YAML (version: 1, partial sections allowed)
//! let config = EngineConfig::from_yaml("engine.yaml")?;
//! ```

pub mod engine_config;
pub mod error;

pub use engine_config::{ArtifactEventConfig, EngineConfig, RemoteCheckConfig};
pub use error::{ConfigError, ConfigResult};
