//! Metadata expiration domain types

use serde::{Deserialize, Serialize};

/// Freshness verdict for previously fetched proxy metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// No baseline to compare against
    Undecided,
    /// Must be re-fetched
    Expired,
    /// Local copy matches the remote
    Usable,
}

/// Checksum sidecar algorithms, in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    Sha1,
    Md5,
}

impl ChecksumAlgorithm {
    pub const FALLBACK_ORDER: [ChecksumAlgorithm; 2] = [ChecksumAlgorithm::Sha1, ChecksumAlgorithm::Md5];

    /// Sidecar file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Md5 => "md5",
        }
    }
}

/// Comparable form of a checksum file: first line, trimmed
///
/// `None` for empty content. Comparison is exact and case-sensitive.
pub fn normalize_checksum(content: &str) -> Option<String> {
    let first = content.lines().next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// What a refresh pass did for one metadata file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub decision: Decision,
    /// A fetch was issued
    pub fetched: bool,
    /// The remote delivered the file
    pub refreshed: bool,
}
