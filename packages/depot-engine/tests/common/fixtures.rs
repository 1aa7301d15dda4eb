//! Repository graphs and wiring helpers

use depot_engine::features::group_resolution::{
    GroupArtifactExistenceChecker, GroupRepositoryPropagator, RoutingRulesCache,
};
use depot_engine::LayoutRegistry;
use depot_storage::{Configuration, ConfigurationManager, Repository, RepositoryFiles, RoutingRule, Storage};
use std::sync::Arc;

pub const STORAGE: &str = "storage0";
pub const JAR: &str = "a/1.0/a-1.0.jar";

/// `G = [leaf1, leaf2]`
pub fn flat_group() -> Configuration {
    Configuration::new().with_storage(
        Storage::new(STORAGE)
            .with_repository(Repository::hosted(STORAGE, "leaf1"))
            .with_repository(Repository::hosted(STORAGE, "leaf2"))
            .with_repository(Repository::group(STORAGE, "G", &["leaf1", "leaf2"])),
    )
}

/// `leaf → A → B`
pub fn chain() -> Configuration {
    Configuration::new().with_storage(
        Storage::new(STORAGE)
            .with_repository(Repository::hosted(STORAGE, "leaf"))
            .with_repository(Repository::group(STORAGE, "A", &["leaf"]))
            .with_repository(Repository::group(STORAGE, "B", &["A"])),
    )
}

/// `leaf → A → B → C`, plus `A → D → C` as a second route to C
pub fn diamond() -> Configuration {
    Configuration::new().with_storage(
        Storage::new(STORAGE)
            .with_repository(Repository::hosted(STORAGE, "leaf"))
            .with_repository(Repository::group(STORAGE, "A", &["leaf"]))
            .with_repository(Repository::group(STORAGE, "B", &["A"]))
            .with_repository(Repository::group(STORAGE, "D", &["A"]))
            .with_repository(Repository::group(STORAGE, "C", &["B", "D"])),
    )
}

/// Nested groups across two storages, with a proxy
///
/// ```text
/// public = [releases, internal, storage1:thirdparty, central]
/// internal = [snapshots, releases]
/// ```
pub fn nested() -> Configuration {
    Configuration::new()
        .with_storage(
            Storage::new(STORAGE)
                .with_repository(Repository::hosted(STORAGE, "releases"))
                .with_repository(Repository::hosted(STORAGE, "snapshots"))
                .with_repository(Repository::proxy(STORAGE, "central", "https://central.example.org/maven2"))
                .with_repository(Repository::group(STORAGE, "internal", &["snapshots", "releases"]))
                .with_repository(Repository::group(
                    STORAGE,
                    "public",
                    &["releases", "internal", "storage1:thirdparty", "central"],
                )),
        )
        .with_storage(Storage::new("storage1").with_repository(Repository::hosted("storage1", "thirdparty")))
}

pub fn with_rule(configuration: Configuration, rule: RoutingRule) -> Configuration {
    configuration.with_routing_rule(rule)
}

pub struct Wired {
    pub configuration: Arc<ConfigurationManager>,
    pub existence: Arc<GroupArtifactExistenceChecker>,
    pub propagator: GroupRepositoryPropagator,
}

impl Wired {
    pub fn repository(&self, id: &str) -> Repository {
        self.configuration
            .snapshot()
            .repository(STORAGE, id)
            .unwrap()
            .clone()
    }
}

/// Existence checker and propagator over `configuration` and `files`
pub fn wire(configuration: Configuration, files: Arc<dyn RepositoryFiles>) -> Wired {
    let configuration = Arc::new(ConfigurationManager::new(configuration).unwrap());
    let layouts = Arc::new(LayoutRegistry::with_defaults());
    let existence = Arc::new(GroupArtifactExistenceChecker::new(
        configuration.clone(),
        files,
        layouts.clone(),
    ));
    let propagator = GroupRepositoryPropagator::new(
        configuration.clone(),
        Arc::new(RoutingRulesCache::new()),
        existence.clone(),
        layouts,
    );
    Wired {
        configuration,
        existence,
        propagator,
    }
}
