//! Configuration types for a scan run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default ceiling on simultaneously in-flight bucket scans.
///
/// Account-specific API rate limits vary; lower it if the account throttles.
pub const DEFAULT_MAX_CONCURRENT_SCANS: usize = 50;

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for a scan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of bucket scans in flight at once
    pub max_concurrent_scans: usize,

    /// Timeout applied to each storage call, in seconds
    pub timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrent_scans: DEFAULT_MAX_CONCURRENT_SCANS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ScanConfig {
    /// Create a new scan configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of concurrent bucket scans.
    ///
    /// Values below 1 are raised to 1.
    pub fn with_max_concurrent_scans(mut self, max: usize) -> Self {
        self.max_concurrent_scans = max.max(1);
        self
    }

    /// Set the per-call timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// The per-call timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
