//! Prometheus metrics for remote status checks

use super::status_registry::RemoteRepositoryStatusRegistry;
use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Opts, Registry,
};

#[derive(Clone)]
pub struct ProxyMetrics {
    pub probe_attempts: IntCounter,
    pub probe_failures: IntCounter,
    pub online: IntGauge,
    pub offline: IntGauge,
}

impl ProxyMetrics {
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        Ok(Self {
            probe_attempts: register_int_counter_with_registry!(
                Opts::new("depot_remote_probe_attempts_total", "Remote liveness probes issued"),
                registry
            )?,
            probe_failures: register_int_counter_with_registry!(
                Opts::new("depot_remote_probe_failures_total", "Remote liveness probes that failed"),
                registry
            )?,
            online: register_int_gauge_with_registry!(
                Opts::new("depot_remote_online", "Remote URLs currently ONLINE"),
                registry
            )?,
            offline: register_int_gauge_with_registry!(
                Opts::new("depot_remote_offline", "Remote URLs currently OFFLINE"),
                registry
            )?,
        })
    }

    pub fn refresh_gauges(&self, statuses: &RemoteRepositoryStatusRegistry) {
        let (online, offline) = statuses.counts();
        self.online.set(online as i64);
        self.offline.set(offline as i64);
    }

    pub fn failure_rate(&self) -> f64 {
        let attempts = self.probe_attempts.get() as f64;
        if attempts > 0.0 {
            self.probe_failures.get() as f64 / attempts
        } else {
            0.0
        }
    }
}
