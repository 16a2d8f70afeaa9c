//! Statistics for census runs.

use bc_error::{ErrorCategory, StorageError, classify_storage_error};
use bc_types::BucketSummary;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::scanner::DropReason;

/// A bucket whose scan failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketFailure {
    /// Bucket name
    pub bucket: String,

    /// Whether the failure looks transient
    pub category: ErrorCategory,

    /// Error text
    pub message: String,
}

impl BucketFailure {
    /// Build a failure record from a storage error.
    pub fn new(bucket: impl Into<String>, error: &StorageError) -> Self {
        Self {
            bucket: bucket.into(),
            category: classify_storage_error(error),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for BucketFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.bucket, self.category, self.message)
    }
}

/// Statistics collected during a census run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Buckets returned by the account listing
    pub buckets_listed: usize,

    /// Buckets that made it into the report
    pub buckets_emitted: usize,

    /// Buckets dropped for lacking lifecycle rules
    pub buckets_dropped_lifecycle: usize,

    /// Buckets dropped by the region filter
    pub buckets_dropped_region: usize,

    /// Files counted across emitted buckets
    pub files_counted: u64,

    /// Bytes counted across emitted buckets
    pub bytes_counted: u64,

    /// Buckets whose scan failed
    pub failures: Vec<BucketFailure>,
}

impl ScanStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the run as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record a bucket that made it into the report.
    pub fn record_emitted(&mut self, summary: &BucketSummary) {
        self.buckets_emitted += 1;
        self.files_counted = self.files_counted.saturating_add(summary.file_count);
        self.bytes_counted = self.bytes_counted.saturating_add(summary.total_size);
    }

    /// Record a bucket that was filtered out.
    pub fn record_dropped(&mut self, reason: &DropReason) {
        match reason {
            DropReason::NoLifecycle => self.buckets_dropped_lifecycle += 1,
            DropReason::RegionExcluded(_) => self.buckets_dropped_region += 1,
        }
    }

    /// Record a failed bucket.
    pub fn record_failure(&mut self, failure: BucketFailure) {
        self.failures.push(failure);
    }

    /// Buckets dropped for any reason.
    pub fn buckets_dropped(&self) -> usize {
        self.buckets_dropped_lifecycle + self.buckets_dropped_region
    }

    /// Get the duration of the run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Check if any bucket failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Get the number of failed buckets.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
