//! Copy-on-write holder of the current configuration snapshot
//!
//! Readers take an `Arc<Configuration>` and traverse it without locks; admin
//! mutations clone, validate and swap the whole snapshot so a reader never
//! observes a half-applied change.

use super::configuration::Configuration;
use crate::Result;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct ConfigurationManager {
    current: RwLock<Arc<Configuration>>,
}

impl ConfigurationManager {
    /// Wrap a configuration after validating it
    pub fn new(configuration: Configuration) -> Result<Self> {
        configuration.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(configuration)),
        })
    }

    /// Load from a YAML file (validated)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let configuration = Configuration::from_yaml_file(path.as_ref())?;
        info!(
            "Loaded repository configuration from {} ({} storages)",
            path.as_ref().display(),
            configuration.storages().count()
        );
        Self::new(configuration)
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Configuration> {
        Arc::clone(&self.current.read())
    }

    /// Replace the snapshot; the old one stays valid for in-flight readers
    pub fn replace(&self, configuration: Configuration) -> Result<()> {
        configuration.validate()?;
        *self.current.write() = Arc::new(configuration);
        Ok(())
    }

    /// Apply a mutation to a copy of the current snapshot, validate, swap
    pub fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Configuration),
    {
        let mut guard = self.current.write();
        let mut next = Configuration::clone(&guard);
        mutate(&mut next);
        next.validate()?;
        *guard = Arc::new(next);
        Ok(())
    }
}
