//! Engine settings: remote status checks and artifact event handling

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Remote repository status check settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RemoteCheckConfig {
    /// Seconds between status sweeps (and minimum age before a recheck)
    pub check_interval_secs: u64,
    /// Probes per check before a remote is marked offline
    pub max_attempts: u32,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for RemoteCheckConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
            max_attempts: 3,
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
        }
    }
}

impl RemoteCheckConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Builder: max_attempts
    pub fn max_attempts(mut self, value: u32) -> Self {
        self.max_attempts = value;
        self
    }

    /// Builder: check interval in seconds
    pub fn check_interval_secs(mut self, value: u64) -> Self {
        self.check_interval_secs = value;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=10).contains(&self.max_attempts) {
            return Err(ConfigError::range_with_hint(
                "remote.max_attempts",
                self.max_attempts,
                1,
                10,
                "Use 3 for the default retry policy",
            ));
        }
        if !(1..=86_400).contains(&self.check_interval_secs) {
            return Err(ConfigError::range_with_hint(
                "remote.check_interval_secs",
                self.check_interval_secs,
                1,
                86_400,
                "Rechecks run at most once per second",
            ));
        }
        for (field, value) in [
            ("remote.connect_timeout_ms", self.connect_timeout_ms),
            ("remote.read_timeout_ms", self.read_timeout_ms),
        ] {
            if !(1..=600_000).contains(&value) {
                return Err(ConfigError::range_with_hint(
                    field,
                    value,
                    1,
                    600_000,
                    "Timeouts are in milliseconds (default 5000)",
                ));
            }
        }
        Ok(())
    }
}

/// Artifact event handling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ArtifactEventConfig {
    /// Retries on optimistic concurrency conflicts
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// Worker tasks draining the event queue
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for ArtifactEventConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_backoff_ms: 10,
            workers: 4,
            queue_capacity: 256,
        }
    }
}

impl ArtifactEventConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=256).contains(&self.workers) {
            return Err(ConfigError::range_with_hint(
                "events.workers",
                self.workers,
                1,
                256,
                "One worker serializes all events",
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::range_with_hint(
                "events.queue_capacity",
                self.queue_capacity,
                1,
                usize::MAX,
                "The queue must hold at least one event",
            ));
        }
        if self.max_retries > 1000 {
            return Err(ConfigError::range_with_hint(
                "events.max_retries",
                self.max_retries,
                0,
                1000,
                "Conflicts that survive 10 retries usually indicate a hot path",
            ));
        }
        Ok(())
    }
}

/// Engine settings file (YAML v1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub version: Option<u32>,
    #[serde(default)]
    pub remote: RemoteCheckConfig,
    #[serde(default)]
    pub events: ArtifactEventConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: Some(1),
            remote: RemoteCheckConfig::default(),
            events: ArtifactEventConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        match self.version {
            None => return Err(ConfigError::MissingVersion),
            Some(v) if !SUPPORTED_VERSIONS.contains(&v) => {
                return Err(ConfigError::UnsupportedVersion {
                    found: v,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                })
            }
            Some(_) => {}
        }
        self.remote.validate()?;
        self.events.validate()
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.remote.max_attempts, 3);
        assert_eq!(config.remote.connect_timeout(), Duration::from_millis(5000));
        assert_eq!(config.events.max_retries, 10);
        assert_eq!(config.events.retry_backoff(), Duration::from_millis(10));
    }

    #[test]
    fn test_yaml_loading_partial_overrides() {
        let yaml = r#"
version: 1
remote:
  check_interval_secs: 5
events:
  workers: 2
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = EngineConfig::from_yaml(file.path()).unwrap();
        assert_eq!(config.remote.check_interval(), Duration::from_secs(5));
        assert_eq!(config.remote.max_attempts, 3);
        assert_eq!(config.events.workers, 2);
        assert_eq!(config.events.queue_capacity, 256);
    }

    #[test]
    fn test_yaml_missing_version() {
        let err = EngineConfig::from_yaml_str("remote:\n  max_attempts: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let err = EngineConfig::from_yaml_str("version: 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_range_validation() {
        let err = EngineConfig::from_yaml_str("version: 1\nremote:\n  max_attempts: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Range { ref field, .. } if field == "remote.max_attempts"));

        let err = EngineConfig::from_yaml_str("version: 1\nevents:\n  workers: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Range { ref field, .. } if field == "events.workers"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = EngineConfig::from_yaml_str("version: 1\nremote:\n  retries: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let yaml = EngineConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("max_attempts: 3"));
        assert_eq!(EngineConfig::from_yaml_str(&yaml).unwrap(), EngineConfig::default());
    }
}
