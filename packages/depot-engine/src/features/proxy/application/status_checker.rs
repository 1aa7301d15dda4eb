//! Remote repository status checker
//!
//! Bounded-retry liveness probes plus the periodic sweep driving them.
//!
//! ```ignore
//! let checker = Arc::new(RemoteRepositoryStatusChecker::new(registry, resolver, config.remote));
//! let cancel = CancellationToken::new();
//! let handle = checker.clone().spawn(cancel.clone());
//! // ...
//! cancel.cancel();
//! handle.await?;
//! ```

use super::metrics::ProxyMetrics;
use super::status_registry::RemoteRepositoryStatusRegistry;
use crate::config::RemoteCheckConfig;
use crate::features::proxy::domain::{RemoteRepositoryStatus, RemoteRepositoryStatusInfo};
use crate::features::proxy::ports::RemoteResolver;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct RemoteRepositoryStatusChecker {
    registry: Arc<RemoteRepositoryStatusRegistry>,
    resolver: Arc<dyn RemoteResolver>,
    config: RemoteCheckConfig,
    metrics: Option<ProxyMetrics>,
}

impl RemoteRepositoryStatusChecker {
    pub fn new(
        registry: Arc<RemoteRepositoryStatusRegistry>,
        resolver: Arc<dyn RemoteResolver>,
        config: RemoteCheckConfig,
    ) -> Self {
        Self {
            registry,
            resolver,
            config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: ProxyMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &Arc<RemoteRepositoryStatusRegistry> {
        &self.registry
    }

    pub fn status(&self, url: &str) -> RemoteRepositoryStatus {
        self.registry.status(url)
    }

    /// Probe `url` up to `max_attempts` times
    ///
    /// The first successful probe marks the URL ONLINE; when every attempt
    /// fails it is marked OFFLINE. Probe failures are logged, never returned.
    pub async fn check_remote(&self, url: &str) -> bool {
        self.registry.mark_checking(url);

        let mut online = false;
        for attempt in 1..=self.config.max_attempts {
            if let Some(metrics) = &self.metrics {
                metrics.probe_attempts.inc();
            }
            if self.probe(url, attempt).await {
                online = true;
                break;
            }
            if let Some(metrics) = &self.metrics {
                metrics.probe_failures.inc();
            }
        }

        let status = if online {
            RemoteRepositoryStatus::Online
        } else {
            RemoteRepositoryStatus::Offline
        };
        self.registry.update(RemoteRepositoryStatusInfo {
            url: url.to_string(),
            status,
            last_checked_epoch_millis: Some(Utc::now().timestamp_millis()),
        });
        if let Some(metrics) = &self.metrics {
            metrics.refresh_gauges(&self.registry);
        }

        if online {
            debug!(url, "Remote repository is online");
        } else {
            warn!(url, attempts = self.config.max_attempts, "Remote repository is offline");
        }
        online
    }

    async fn probe(&self, url: &str, attempt: u32) -> bool {
        let deadline = self.config.connect_timeout() + self.config.read_timeout();
        match tokio::time::timeout(deadline, self.resolver.path_exists(url)).await {
            Ok(Ok(true)) => true,
            Ok(Ok(false)) => {
                debug!(url, attempt, "Remote probe got an unsuccessful response");
                false
            }
            Ok(Err(err)) => {
                debug!(url, attempt, error = %err, "Remote probe failed");
                false
            }
            Err(_) => {
                debug!(url, attempt, timeout_ms = deadline.as_millis() as u64, "Remote probe timed out");
                false
            }
        }
    }

    /// Recheck every URL that is UNKNOWN or older than the check interval
    ///
    /// Returns the number of URLs checked.
    pub async fn check_all(&self) -> usize {
        self.check_due(&CancellationToken::new()).await
    }

    /// Like `check_all`, but stops between URLs once `cancel` fires
    ///
    /// A check already started always completes, so no URL is left CHECKING.
    async fn check_due(&self, cancel: &CancellationToken) -> usize {
        let due = self
            .registry
            .due_for_check(Utc::now().timestamp_millis(), self.config.check_interval());
        let mut checked = 0;
        for url in &due {
            if cancel.is_cancelled() {
                debug!(remaining = due.len() - checked, "Remote status sweep cancelled");
                break;
            }
            self.check_remote(url).await;
            checked += 1;
        }
        checked
    }

    /// Sweep, sleep `check_interval`, repeat until `cancel` fires
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_secs = self.config.check_interval_secs,
            tracked = self.registry.len(),
            "Remote status checker started"
        );
        while !cancel.is_cancelled() {
            let checked = self.check_due(&cancel).await;
            debug!(checked, "Remote status sweep finished");
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.check_interval()) => {}
            }
        }
        info!("Remote status checker stopped");
    }

    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    pub fn check_interval(&self) -> Duration {
        self.config.check_interval()
    }
}
