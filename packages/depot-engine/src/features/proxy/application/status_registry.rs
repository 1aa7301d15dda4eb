//! Remote URL → status registry

use crate::features::proxy::domain::{RemoteRepositoryStatus, RemoteRepositoryStatusInfo};
use dashmap::DashMap;
use depot_storage::Configuration;
use std::time::Duration;
use tracing::{debug, info};

/// Process-wide liveness state, one entry per distinct remote URL
///
/// Constructed once by the composition root and shared by `Arc`.
#[derive(Debug, Default)]
pub struct RemoteRepositoryStatusRegistry {
    statuses: DashMap<String, RemoteRepositoryStatusInfo>,
}

impl RemoteRepositoryStatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `url` (as UNKNOWN) unless it is tracked already
    pub fn register(&self, url: &str) -> bool {
        let mut inserted = false;
        self.statuses.entry(url.to_string()).or_insert_with(|| {
            inserted = true;
            RemoteRepositoryStatusInfo::unknown(url)
        });
        if inserted {
            debug!(url, "Tracking remote repository");
        }
        inserted
    }

    /// Track the remote of every proxy repository with alive checks enabled
    pub fn register_configuration(&self, configuration: &Configuration) -> usize {
        let registered = configuration
            .repositories()
            .filter_map(|repository| repository.remote.as_ref())
            .filter(|remote| remote.alive_check)
            .filter(|remote| self.register(&remote.url))
            .count();
        info!(registered, tracked = self.len(), "Registered proxy remotes");
        registered
    }

    pub fn remove(&self, url: &str) -> Option<RemoteRepositoryStatusInfo> {
        self.statuses.remove(url).map(|(_, info)| info)
    }

    pub fn get(&self, url: &str) -> Option<RemoteRepositoryStatusInfo> {
        self.statuses.get(url).map(|entry| entry.value().clone())
    }

    /// Current status, UNKNOWN for untracked URLs
    pub fn status(&self, url: &str) -> RemoteRepositoryStatus {
        self.statuses
            .get(url)
            .map(|entry| entry.status)
            .unwrap_or(RemoteRepositoryStatus::Unknown)
    }

    /// Replace the whole entry for one URL
    pub fn update(&self, info: RemoteRepositoryStatusInfo) {
        self.statuses.insert(info.url.clone(), info);
    }

    /// Move `url` to CHECKING, keeping its last check time
    pub fn mark_checking(&self, url: &str) {
        self.statuses
            .entry(url.to_string())
            .and_modify(|info| info.status = RemoteRepositoryStatus::Checking)
            .or_insert_with(|| RemoteRepositoryStatusInfo {
                url: url.to_string(),
                status: RemoteRepositoryStatus::Checking,
                last_checked_epoch_millis: None,
            });
    }

    /// URLs a sweep at `now_millis` should recheck, sorted
    pub fn due_for_check(&self, now_millis: i64, interval: Duration) -> Vec<String> {
        let mut urls: Vec<String> = self
            .statuses
            .iter()
            .filter(|entry| entry.is_due(now_millis, interval))
            .map(|entry| entry.key().clone())
            .collect();
        urls.sort();
        urls
    }

    /// All entries, sorted by URL
    pub fn status_snapshot(&self) -> Vec<RemoteRepositoryStatusInfo> {
        let mut infos: Vec<_> = self.statuses.iter().map(|entry| entry.value().clone()).collect();
        infos.sort_by(|a, b| a.url.cmp(&b.url));
        infos
    }

    /// (online, offline) counts
    pub fn counts(&self) -> (usize, usize) {
        self.statuses
            .iter()
            .fold((0, 0), |(online, offline), entry| match entry.status {
                RemoteRepositoryStatus::Online => (online + 1, offline),
                RemoteRepositoryStatus::Offline => (online, offline + 1),
                _ => (online, offline),
            })
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_storage::{Repository, Storage};

    #[test]
    fn test_register_once() {
        let registry = RemoteRepositoryStatusRegistry::new();
        assert!(registry.register("https://a"));
        assert!(!registry.register("https://a"));
        assert_eq!(registry.status("https://a"), RemoteRepositoryStatus::Unknown);
        assert_eq!(registry.status("https://untracked"), RemoteRepositoryStatus::Unknown);
    }

    #[test]
    fn test_register_configuration_skips_disabled_alive_check() {
        let mut quiet = Repository::proxy("s", "quiet", "https://quiet.example.org");
        if let Some(remote) = quiet.remote.as_mut() {
            remote.alive_check = false;
        }
        let configuration = Configuration::new().with_storage(
            Storage::new("s")
                .with_repository(Repository::proxy("s", "central", "https://central.example.org"))
                .with_repository(Repository::proxy("s", "mirror", "https://central.example.org"))
                .with_repository(quiet)
                .with_repository(Repository::hosted("s", "releases")),
        );

        let registry = RemoteRepositoryStatusRegistry::new();
        assert_eq!(registry.register_configuration(&configuration), 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("https://quiet.example.org").is_none());
    }

    #[test]
    fn test_due_and_counts() {
        let registry = RemoteRepositoryStatusRegistry::new();
        registry.register("https://unknown");
        registry.update(RemoteRepositoryStatusInfo {
            url: "https://fresh".into(),
            status: RemoteRepositoryStatus::Online,
            last_checked_epoch_millis: Some(10_000),
        });
        registry.update(RemoteRepositoryStatusInfo {
            url: "https://stale".into(),
            status: RemoteRepositoryStatus::Offline,
            last_checked_epoch_millis: Some(0),
        });

        let due = registry.due_for_check(10_500, Duration::from_secs(1));
        assert_eq!(due, vec!["https://stale".to_string(), "https://unknown".to_string()]);
        assert_eq!(registry.counts(), (1, 1));

        registry.mark_checking("https://stale");
        assert_eq!(registry.status("https://stale"), RemoteRepositoryStatus::Checking);
        assert_eq!(registry.get("https://stale").unwrap().last_checked_epoch_millis, Some(0));

        assert!(registry.remove("https://stale").is_some());
        assert_eq!(registry.status_snapshot().len(), 2);
    }
}
