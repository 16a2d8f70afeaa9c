//! Per-bucket scan: lifecycle check, object listing, aggregation.

use bc_error::StorageError;
use bc_traits::StorageApi;
use bc_types::{BucketRef, BucketSummary};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::aggregate::aggregate;
use crate::filter::FilterPolicy;

/// Why a bucket was left out of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Lifecycle rules were required and the bucket has none
    NoLifecycle,

    /// The bucket's region is not in the allowed set
    RegionExcluded(String),
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLifecycle => write!(f, "no lifecycle rules"),
            Self::RegionExcluded(region) => write!(f, "region {region} excluded"),
        }
    }
}

/// Terminal state of a successful bucket scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The bucket passed every filter
    Emitted(BucketSummary),

    /// The bucket was filtered out
    Dropped(DropReason),
}

impl ScanOutcome {
    /// The summary, if the bucket was emitted.
    pub fn into_summary(self) -> Option<BucketSummary> {
        match self {
            Self::Emitted(summary) => Some(summary),
            Self::Dropped(_) => None,
        }
    }
}

/// Scans a single bucket against a filter policy.
///
/// Each storage call is bounded by `timeout`; a call that does not finish
/// in time fails the bucket with [`StorageError::Timeout`]. Nothing is
/// retried.
pub struct BucketScanner<S: StorageApi> {
    storage: S,
    policy: FilterPolicy,
    timeout: Duration,
}

impl<S: StorageApi> BucketScanner<S> {
    /// Create a new scanner.
    pub fn new(storage: S, policy: FilterPolicy, timeout: Duration) -> Self {
        Self {
            storage,
            policy,
            timeout,
        }
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The filter policy.
    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Scan one bucket.
    ///
    /// A missing lifecycle configuration drops the bucket; any other
    /// lifecycle failure is returned as an error so it is never mistaken
    /// for "no lifecycle".
    pub async fn scan(&self, bucket: &BucketRef) -> Result<ScanOutcome, StorageError> {
        let name = bucket.name.as_str();

        if self.policy.lifecycle_required() {
            let lifecycle = self
                .bounded(name, "lifecycle_configuration", || {
                    self.storage.lifecycle_configuration(name)
                })
                .await?;

            if !lifecycle.is_some_and(|c| c.has_rules()) {
                debug!(bucket = %name, "Dropped: no lifecycle rules");
                return Ok(ScanOutcome::Dropped(DropReason::NoLifecycle));
            }
        }

        let listing = self
            .bounded(name, "list_objects", || {
                self.storage.list_objects(name, self.policy.prefix())
            })
            .await?;

        let Some(fragment) = aggregate(&listing.objects, &listing.region, &self.policy) else {
            debug!(bucket = %name, region = %listing.region, "Dropped: region excluded");
            return Ok(ScanOutcome::Dropped(DropReason::RegionExcluded(
                listing.region,
            )));
        };

        if listing.truncated {
            warn!(
                bucket = %name,
                objects = listing.objects.len(),
                "Listing truncated, counts cover the first page only"
            );
        }

        let summary = fragment.into_summary(bucket, listing.truncated);
        debug!(
            bucket = %name,
            region = %summary.region,
            files = summary.file_count,
            bytes = summary.total_size,
            "Scanned bucket"
        );

        Ok(ScanOutcome::Emitted(summary))
    }

    async fn bounded<T, F, Fut>(
        &self,
        bucket: &str,
        operation: &str,
        call: F,
    ) -> Result<T, StorageError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        match tokio::time::timeout(self.timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout {
                bucket: bucket.to_string(),
                operation: operation.to_string(),
                secs: self.timeout.as_secs(),
            }),
        }
    }
}
