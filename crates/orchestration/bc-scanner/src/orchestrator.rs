//! Census run: list buckets, scan them with bounded parallelism, price
//! the month.

use bc_error::{CensusError, CostError, Result, StorageError};
use bc_traits::{CostApi, StorageApi};
use bc_types::{BucketRef, BucketSummary, CostFigure, CostWindow};
use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::cost::storage_cost;
use crate::filter::FilterPolicy;
use crate::scanner::{BucketScanner, ScanOutcome};
use crate::stats::{BucketFailure, ScanStats};

/// Result of a census run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Emitted buckets, sorted by name
    pub summaries: Vec<BucketSummary>,

    /// Storage cost over the trailing month
    pub cost: CostFigure,

    /// Run statistics, including per-bucket failures
    pub stats: ScanStats,
}

impl ScanReport {
    /// Check if any bucket failed.
    pub fn has_failures(&self) -> bool {
        self.stats.has_failures()
    }
}

/// Drives a census run over a storage and a billing capability.
pub struct ScanOrchestrator<S: StorageApi, C: CostApi> {
    scanner: BucketScanner<S>,
    cost: C,
    config: ScanConfig,
}

impl<S: StorageApi, C: CostApi> ScanOrchestrator<S, C> {
    /// Create a new orchestrator.
    pub fn new(storage: S, cost: C, policy: FilterPolicy, config: ScanConfig) -> Self {
        let scanner = BucketScanner::new(storage, policy, config.timeout());
        Self {
            scanner,
            cost,
            config,
        }
    }

    /// The filter policy in use.
    pub fn policy(&self) -> &FilterPolicy {
        self.scanner.policy()
    }

    /// Run the census with the cost window ending today.
    pub async fn run(&self) -> Result<ScanReport> {
        self.run_at(Utc::now().date_naive()).await
    }

    /// Run the census with the cost window ending on `today`.
    ///
    /// A failed bucket listing or cost query fails the run, and both are
    /// bounded by the per-call timeout. A failed bucket scan is recorded in
    /// the report's stats and the run carries on.
    pub async fn run_at(&self, today: NaiveDate) -> Result<ScanReport> {
        let mut stats = ScanStats::new();
        let window = CostWindow::trailing_month(today);

        info!(
            filters = %self.policy().description(),
            concurrency = self.concurrency(),
            start = %window.start,
            end = %window.end,
            "Starting census"
        );

        let timeout = self.config.timeout();
        let cost = async {
            match tokio::time::timeout(timeout, storage_cost(&self.cost, &window)).await {
                Ok(result) => result.map_err(CensusError::from),
                Err(_) => Err(CensusError::from(CostError::Timeout {
                    secs: timeout.as_secs(),
                })),
            }
        };
        let scans = async {
            let buckets = tokio::time::timeout(timeout, self.scanner.storage().list_buckets())
                .await
                .map_err(|_| {
                    StorageError::ListBuckets(format!("timed out after {}s", timeout.as_secs()))
                })??;
            info!(bucket_count = buckets.len(), "Listed buckets");
            let results = self.scan_all(&buckets).await;
            Ok::<_, CensusError>((buckets.len(), results))
        };

        let (cost, (listed, results)) = tokio::try_join!(cost, scans)?;
        stats.buckets_listed = listed;

        let mut summaries = Vec::new();
        for (bucket, result) in results {
            match result {
                Ok(ScanOutcome::Emitted(summary)) => {
                    stats.record_emitted(&summary);
                    summaries.push(summary);
                }
                Ok(ScanOutcome::Dropped(reason)) => stats.record_dropped(&reason),
                Err(e) => {
                    let failure = BucketFailure::new(bucket, &e);
                    warn!(
                        bucket = %failure.bucket,
                        category = %failure.category,
                        error = %failure.message,
                        "Bucket scan failed"
                    );
                    stats.record_failure(failure);
                }
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        stats.complete();

        info!(
            listed = stats.buckets_listed,
            emitted = stats.buckets_emitted,
            dropped = stats.buckets_dropped(),
            failed = stats.failure_count(),
            cost = %cost,
            "Census complete"
        );

        Ok(ScanReport {
            summaries,
            cost,
            stats,
        })
    }

    async fn scan_all(
        &self,
        buckets: &[BucketRef],
    ) -> Vec<(String, std::result::Result<ScanOutcome, StorageError>)> {
        let scans = buckets.iter().map(|bucket| async move {
            (bucket.name.clone(), self.scanner.scan(bucket).await)
        });

        stream::iter(scans)
            .buffer_unordered(self.concurrency())
            .collect()
            .await
    }

    fn concurrency(&self) -> usize {
        self.config.max_concurrent_scans.max(1)
    }
}
