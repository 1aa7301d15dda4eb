//! Remote repository liveness state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Liveness of one remote URL
///
/// `Unknown → Checking → {Online, Offline}`, then `Online ⇄ Offline` on rechecks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteRepositoryStatus {
    Online,
    Offline,
    Checking,
    Unknown,
}

impl RemoteRepositoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteRepositoryStatus::Online => "ONLINE",
            RemoteRepositoryStatus::Offline => "OFFLINE",
            RemoteRepositoryStatus::Checking => "CHECKING",
            RemoteRepositoryStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RemoteRepositoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepositoryStatusInfo {
    pub url: String,
    pub status: RemoteRepositoryStatus,
    /// Completion time of the last check, `None` until the first one finishes
    pub last_checked_epoch_millis: Option<i64>,
}

impl RemoteRepositoryStatusInfo {
    pub fn unknown(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: RemoteRepositoryStatus::Unknown,
            last_checked_epoch_millis: None,
        }
    }

    /// Whether a sweep at `now_millis` should recheck this URL
    pub fn is_due(&self, now_millis: i64, interval: Duration) -> bool {
        if self.status == RemoteRepositoryStatus::Unknown {
            return true;
        }
        match self.last_checked_epoch_millis {
            None => true,
            Some(last) => last.saturating_add(interval.as_millis() as i64) <= now_millis,
        }
    }
}
