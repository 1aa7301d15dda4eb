//! Proxy repositories: remote status checks and metadata expiration

mod common;

use common::*;
use depot_engine::features::metadata_expiration::{
    ChecksumMetadataExpirationStrategy, ProxyMetadataRefresher,
};
use depot_engine::features::proxy::ProxyMetrics;
use depot_engine::{
    Decision, MetadataExpirationStrategy, RemoteCheckConfig, RemoteRepositoryStatus,
    LayoutRegistry, RemoteRepositoryStatusChecker, RemoteRepositoryStatusRegistry,
};
use depot_storage::infrastructure::InMemoryRepositoryFiles;
use depot_storage::{Configuration, ConfigurationManager, Repository, RepositoryFiles, RepositoryPath, Storage};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const CENTRAL: &str = "https://central.example.org/maven2";
const METADATA: &str = "org/example/a/maven-metadata.xml";
const SHA1: &str = "org/example/a/maven-metadata.xml.sha1";
const MD5: &str = "org/example/a/maven-metadata.xml.md5";

// ═══════════════════════════════════════════════════════════════════════════
// Remote status
// ═══════════════════════════════════════════════════════════════════════════

fn checker(resolver: Arc<FlakyResolver>) -> RemoteRepositoryStatusChecker {
    RemoteRepositoryStatusChecker::new(
        Arc::new(RemoteRepositoryStatusRegistry::new()),
        resolver,
        RemoteCheckConfig::default().max_attempts(3),
    )
}

#[tokio::test]
async fn test_two_failures_then_online() {
    let resolver = Arc::new(FlakyResolver::failing_times(2));
    let checker = checker(resolver.clone());

    assert!(checker.check_remote(CENTRAL).await);
    assert_eq!(checker.status(CENTRAL), RemoteRepositoryStatus::Online);
    assert_eq!(resolver.probes(), 3);
}

#[tokio::test]
async fn test_all_attempts_fail_marks_offline() {
    let resolver = Arc::new(FlakyResolver::always_failing());
    let checker = checker(resolver.clone());

    assert!(!checker.check_remote(CENTRAL).await);
    assert_eq!(checker.status(CENTRAL), RemoteRepositoryStatus::Offline);
    assert_eq!(resolver.probes(), 3);

    let info = checker.registry().get(CENTRAL).unwrap();
    assert!(info.last_checked_epoch_millis.is_some());
}

#[tokio::test]
async fn test_recovery_after_offline() {
    let resolver = Arc::new(FlakyResolver::failing_times(3));
    let checker = checker(resolver.clone());

    assert!(!checker.check_remote(CENTRAL).await);
    assert!(checker.check_remote(CENTRAL).await);
    assert_eq!(checker.status(CENTRAL), RemoteRepositoryStatus::Online);
    assert_eq!(resolver.probes(), 4);
}

#[test]
fn test_unregistered_url_is_unknown() {
    let registry = RemoteRepositoryStatusRegistry::new();
    assert_eq!(registry.status("https://nowhere.example.org"), RemoteRepositoryStatus::Unknown);
}

#[test]
fn test_registry_seeded_from_configuration() {
    let registry = RemoteRepositoryStatusRegistry::new();
    assert_eq!(registry.register_configuration(&nested()), 1);
    assert_eq!(registry.status(CENTRAL), RemoteRepositoryStatus::Unknown);

    // re-registering keeps the tracked entry
    assert_eq!(registry.register_configuration(&nested()), 0);
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_sweep_checks_registered_proxies() {
    let resolver = Arc::new(FlakyResolver::failing_times(0));
    let registry = Arc::new(RemoteRepositoryStatusRegistry::new());
    registry.register_configuration(&nested());
    let checker = RemoteRepositoryStatusChecker::new(registry.clone(), resolver.clone(), RemoteCheckConfig::default());

    assert_eq!(checker.check_all().await, 1);
    assert_eq!(registry.status(CENTRAL), RemoteRepositoryStatus::Online);
    // checked just now, not due again within the interval
    assert_eq!(checker.check_all().await, 0);
    assert_eq!(resolver.probes(), 1);
}

#[tokio::test]
async fn test_metrics_track_probes() {
    let prometheus = prometheus::Registry::new();
    let metrics = ProxyMetrics::new(&prometheus).unwrap();
    let resolver = Arc::new(FlakyResolver::failing_times(1));
    let checker = checker(resolver).with_metrics(metrics.clone());

    checker.check_remote(CENTRAL).await;
    assert_eq!(metrics.probe_attempts.get(), 2);
    assert_eq!(metrics.probe_failures.get(), 1);
    assert_eq!(metrics.online.get(), 1);
    assert_eq!(metrics.offline.get(), 0);
}

#[tokio::test]
async fn test_status_loop_stops_on_cancel() {
    let resolver = Arc::new(FlakyResolver::failing_times(0));
    let registry = Arc::new(RemoteRepositoryStatusRegistry::new());
    registry.register(CENTRAL);
    let checker = Arc::new(RemoteRepositoryStatusChecker::new(
        registry.clone(),
        resolver,
        RemoteCheckConfig::default().check_interval_secs(3600),
    ));

    let cancel = CancellationToken::new();
    let handle = checker.clone().spawn(cancel.clone());
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(registry.status(CENTRAL), RemoteRepositoryStatus::Online);
}

#[tokio::test]
async fn test_cancel_mid_sweep_finishes_current_check() {
    const MIRROR: &str = "https://mirror.example.org/maven2";
    let resolver = Arc::new(
        FlakyResolver::failing_times(0).with_delay(std::time::Duration::from_millis(200)),
    );
    let registry = Arc::new(RemoteRepositoryStatusRegistry::new());
    registry.register(CENTRAL);
    registry.register(MIRROR);
    let checker = Arc::new(RemoteRepositoryStatusChecker::new(
        registry.clone(),
        resolver.clone(),
        RemoteCheckConfig::default().check_interval_secs(3600),
    ));

    let cancel = CancellationToken::new();
    let handle = checker.clone().spawn(cancel.clone());
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(registry.status(CENTRAL), RemoteRepositoryStatus::Checking);
    cancel.cancel();
    handle.await.unwrap();

    // the started check completed, the next URL was never touched
    assert_eq!(registry.status(CENTRAL), RemoteRepositoryStatus::Online);
    assert_eq!(registry.status(MIRROR), RemoteRepositoryStatus::Unknown);
    assert_eq!(resolver.probes(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Metadata expiration
// ═══════════════════════════════════════════════════════════════════════════

struct ProxySetup {
    configuration: Arc<ConfigurationManager>,
    files: Arc<InMemoryRepositoryFiles>,
}

fn proxy_setup(checksum_policy: bool) -> ProxySetup {
    layout_proxy_setup("maven2", checksum_policy)
}

fn layout_proxy_setup(layout: &str, checksum_policy: bool) -> ProxySetup {
    let mut central = Repository::proxy(STORAGE, "central", CENTRAL).with_layout(layout);
    if let Some(remote) = central.remote.as_mut() {
        remote.checksum_policy = checksum_policy;
    }
    let configuration = Configuration::new().with_storage(Storage::new(STORAGE).with_repository(central));
    ProxySetup {
        configuration: Arc::new(ConfigurationManager::new(configuration).unwrap()),
        files: Arc::new(InMemoryRepositoryFiles::new()),
    }
}

impl ProxySetup {
    fn put(&self, relative: &str, body: &str) {
        self.files
            .write(&RepositoryPath::new(STORAGE, "central", relative), body.as_bytes())
            .unwrap();
    }

    fn read(&self, relative: &str) -> Option<String> {
        self.files
            .read_to_string(&RepositoryPath::new(STORAGE, "central", relative))
            .unwrap()
    }

    fn strategy(&self, remote: Arc<ScriptedRemote>) -> ChecksumMetadataExpirationStrategy {
        ChecksumMetadataExpirationStrategy::new(self.configuration.clone(), self.files.clone(), remote)
    }

    fn refresher(&self, remote: Arc<ScriptedRemote>) -> ProxyMetadataRefresher {
        ProxyMetadataRefresher::new(
            self.configuration.clone(),
            self.files.clone(),
            Arc::new(LayoutRegistry::with_defaults()),
            remote,
        )
    }
}

fn metadata_path() -> RepositoryPath {
    RepositoryPath::new(STORAGE, "central", METADATA)
}

#[tokio::test]
async fn test_matching_sha1_is_usable() {
    let setup = proxy_setup(true);
    setup.put(SHA1, "abc\n");
    let remote = Arc::new(ScriptedRemote::new(setup.files.clone(), &[(SHA1, "abc")]));

    let decision = setup.strategy(remote.clone()).decide(&metadata_path()).await.unwrap();
    assert_eq!(decision, Decision::Usable);
    assert_eq!(remote.fetched(), vec![SHA1]);
}

#[tokio::test]
async fn test_changed_sha1_is_expired() {
    let setup = proxy_setup(true);
    setup.put(SHA1, "abc");
    let remote = Arc::new(ScriptedRemote::new(setup.files.clone(), &[(SHA1, "def")]));

    let decision = setup.strategy(remote).decide(&metadata_path()).await.unwrap();
    assert_eq!(decision, Decision::Expired);
    assert_eq!(setup.read(SHA1).as_deref(), Some("def"));
}

#[tokio::test]
async fn test_md5_decides_when_sha1_missing() {
    let setup = proxy_setup(true);
    setup.put(MD5, "0123");
    let remote = Arc::new(ScriptedRemote::new(setup.files.clone(), &[(MD5, "0123")]));

    let decision = setup.strategy(remote.clone()).decide(&metadata_path()).await.unwrap();
    assert_eq!(decision, Decision::Usable);
    // no local sha1 baseline, so sha1 is never fetched
    assert_eq!(remote.fetched(), vec![MD5]);
}

#[tokio::test]
async fn test_md5_decides_when_remote_sha1_unavailable() {
    let setup = proxy_setup(true);
    setup.put(SHA1, "abc");
    setup.put(MD5, "0123");
    let remote = Arc::new(ScriptedRemote::new(setup.files.clone(), &[(MD5, "4567")]));

    let decision = setup.strategy(remote.clone()).decide(&metadata_path()).await.unwrap();
    assert_eq!(decision, Decision::Expired);
    assert_eq!(remote.fetched(), vec![SHA1, MD5]);
}

#[tokio::test]
async fn test_no_baseline_is_undecided() {
    let setup = proxy_setup(true);
    let remote = Arc::new(ScriptedRemote::new(setup.files.clone(), &[]));

    let decision = setup.strategy(remote.clone()).decide(&metadata_path()).await.unwrap();
    assert_eq!(decision, Decision::Undecided);
    assert!(remote.fetched().is_empty());
}

#[tokio::test]
async fn test_refresher_skips_fetch_when_usable() {
    let setup = proxy_setup(true);
    setup.put(METADATA, "<metadata/>");
    setup.put(SHA1, "abc");
    let remote = Arc::new(ScriptedRemote::new(
        setup.files.clone(),
        &[(SHA1, "abc"), (METADATA, "<metadata><v>2</v></metadata>")],
    ));

    let outcome = setup.refresher(remote.clone()).refresh_if_needed(&metadata_path()).await.unwrap();
    assert_eq!(outcome.decision, Decision::Usable);
    assert!(!outcome.fetched);
    assert_eq!(setup.read(METADATA).as_deref(), Some("<metadata/>"));
}

#[tokio::test]
async fn test_refresher_fetches_when_expired() {
    let setup = proxy_setup(true);
    setup.put(METADATA, "<metadata/>");
    setup.put(SHA1, "abc");
    let remote = Arc::new(ScriptedRemote::new(
        setup.files.clone(),
        &[(SHA1, "def"), (METADATA, "<metadata><v>2</v></metadata>")],
    ));

    let outcome = setup.refresher(remote.clone()).refresh_if_needed(&metadata_path()).await.unwrap();
    assert_eq!(outcome.decision, Decision::Expired);
    assert!(outcome.fetched && outcome.refreshed);
    assert_eq!(setup.read(METADATA).as_deref(), Some("<metadata><v>2</v></metadata>"));
}

#[tokio::test]
async fn test_refresher_fetches_when_undecided() {
    let setup = proxy_setup(true);
    let remote = Arc::new(ScriptedRemote::new(setup.files.clone(), &[(METADATA, "<metadata/>")]));

    let outcome = setup.refresher(remote).refresh_if_needed(&metadata_path()).await.unwrap();
    assert_eq!(outcome.decision, Decision::Undecided);
    assert!(outcome.fetched);
    assert_eq!(setup.read(METADATA).as_deref(), Some("<metadata/>"));
}

#[tokio::test]
async fn test_refresher_without_checksum_policy_always_fetches() {
    let setup = proxy_setup(false);
    setup.put(SHA1, "abc");
    let remote = Arc::new(ScriptedRemote::new(
        setup.files.clone(),
        &[(SHA1, "abc"), (METADATA, "<metadata/>")],
    ));

    let outcome = setup.refresher(remote.clone()).refresh_if_needed(&metadata_path()).await.unwrap();
    assert_eq!(outcome.decision, Decision::Expired);
    assert_eq!(remote.fetched(), vec![METADATA.to_string()]);
}

#[tokio::test]
async fn test_refresher_serves_artifacts_without_expiration() {
    let setup = proxy_setup(true);
    let jar = "org/example/a/1.0/a-1.0.jar";
    setup.put(jar, "cached");
    let remote = Arc::new(ScriptedRemote::new(setup.files.clone(), &[(jar, "remote")]));
    let refresher = setup.refresher(remote.clone());

    for relative in [jar.to_string(), format!("{}.sha1", jar)] {
        let outcome = refresher
            .refresh_if_needed(&RepositoryPath::new(STORAGE, "central", &relative))
            .await
            .unwrap();
        assert_eq!(outcome.decision, Decision::Usable);
        assert!(!outcome.fetched);
    }
    assert!(remote.fetched().is_empty());
    assert_eq!(setup.read(jar).as_deref(), Some("cached"));
}

#[tokio::test]
async fn test_refresher_follows_repository_layout() {
    let setup = layout_proxy_setup("npm", false);
    let document = "left-pad/package.json";
    let tarball = "left-pad/-/left-pad-1.3.0.tgz";
    let remote = Arc::new(ScriptedRemote::new(
        setup.files.clone(),
        &[(document, "{}"), (tarball, "tgz"), (METADATA, "<metadata/>")],
    ));
    let refresher = setup.refresher(remote.clone());

    for relative in [tarball, METADATA] {
        let outcome = refresher
            .refresh_if_needed(&RepositoryPath::new(STORAGE, "central", relative))
            .await
            .unwrap();
        assert!(!outcome.fetched, "{} is not npm metadata", relative);
    }

    let outcome = refresher
        .refresh_if_needed(&RepositoryPath::new(STORAGE, "central", document))
        .await
        .unwrap();
    assert!(outcome.fetched);
    assert_eq!(remote.fetched(), vec![document.to_string()]);
}
