//! Layout name → hooks lookup

use super::ports::LayoutHooks;
use super::providers::{Maven2Layout, NpmLayout, SuffixLayout};
use crate::errors::{EngineError, Result};
use depot_storage::Repository;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of layout providers, keyed by layout name
#[derive(Clone, Default)]
pub struct LayoutRegistry {
    layouts: HashMap<String, Arc<dyn LayoutHooks>>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// maven2, npm, nuget, pypi, rpm and raw
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Maven2Layout));
        registry.register(Arc::new(NpmLayout));
        registry.register(Arc::new(SuffixLayout::nuget()));
        registry.register(Arc::new(SuffixLayout::pypi()));
        registry.register(Arc::new(SuffixLayout::rpm()));
        registry.register(Arc::new(SuffixLayout::raw()));
        registry
    }

    /// Register (or replace) a provider under its own name
    pub fn register(&mut self, layout: Arc<dyn LayoutHooks>) -> Option<Arc<dyn LayoutHooks>> {
        let name = layout.name().to_string();
        debug!(layout = %name, "Registering layout provider");
        self.layouts.insert(name, layout)
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn LayoutHooks>> {
        self.layouts
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownLayout(name.to_string()))
    }

    pub fn for_repository(&self, repository: &Repository) -> Result<Arc<dyn LayoutHooks>> {
        self.get(&repository.layout)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layouts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutRegistry")
            .field("layouts", &self.names())
            .finish()
    }
}
