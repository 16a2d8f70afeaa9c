//! bc-scanner - bounded-parallel S3 bucket census.
//!
//! This crate scans every bucket in an account and reports per-bucket
//! usage alongside the account's storage cost. It supports:
//!
//! - Region, key-prefix and lifecycle filters combined into one policy
//! - Bounded fan-out of bucket scans with per-bucket failure isolation
//! - Per-call timeouts on every storage call
//! - Region-aware S3 access with LocalStack support
//! - Trailing-month storage cost from Cost Explorer
//!
//! # Example
//!
//! ```ignore
//! use bc_scanner::{CostExplorer, CostExplorerConfig, FilterPolicy, S3Config, S3Storage};
//! use bc_scanner::{ScanConfig, ScanOrchestrator, create_cost_client};
//!
//! let storage = S3Storage::connect(&S3Config::new().with_region("us-east-1")).await;
//! let cost = CostExplorer::new(create_cost_client(&CostExplorerConfig::new()).await?);
//!
//! let policy = FilterPolicy::new()
//!     .with_region_list("us-east-1,eu-west-1")
//!     .with_lifecycle_required(true);
//!
//! let orchestrator = ScanOrchestrator::new(storage, cost, policy, ScanConfig::new());
//! let report = orchestrator.run().await?;
//! eprintln!("{} buckets, {}", report.summaries.len(), report.cost);
//! ```

pub mod aggregate;
pub mod config;
pub mod cost;
pub mod filter;
pub mod orchestrator;
pub mod s3;
pub mod scanner;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::{AggregateFragment, aggregate};
pub use config::ScanConfig;
pub use cost::{CostExplorer, CostExplorerConfig, create_cost_client, storage_cost, summarize_costs};
pub use filter::FilterPolicy;
pub use orchestrator::{ScanOrchestrator, ScanReport};
pub use s3::{S3Config, S3Storage};
pub use scanner::{BucketScanner, DropReason, ScanOutcome};
pub use stats::{BucketFailure, ScanStats};
