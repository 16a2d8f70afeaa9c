//! Filter policy for a scan run.
//!
//! The policy is built once from user input and shared read-only by every
//! bucket scan.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label used in reports for a filter that is not active.
pub const NOT_APPLIED: &str = "Not Applied";

/// User-supplied region, prefix and lifecycle filters.
///
/// # Example
///
/// ```
/// use bc_scanner::FilterPolicy;
///
/// let policy = FilterPolicy::new()
///     .with_regions(["us-east-1", "eu-west-1"])
///     .with_prefix("logs/");
///
/// assert!(policy.region_allowed("eu-west-1"));
/// assert!(!policy.region_allowed("us-west-2"));
/// assert_eq!(policy.prefix(), "logs/");
/// assert!(!policy.lifecycle_required());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPolicy {
    allowed_regions: BTreeSet<String>,
    prefix: String,
    require_lifecycle: bool,
}

impl FilterPolicy {
    /// Create a policy that admits every bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict results to the given regions.
    ///
    /// Entries are trimmed and empty entries ignored, so an all-empty
    /// list leaves the policy unrestricted.
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_regions = regions
            .into_iter()
            .map(|r| r.as_ref().trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        self
    }

    /// Restrict results to the regions in a comma-separated list.
    pub fn with_region_list(self, list: &str) -> Self {
        self.with_regions(list.split(','))
    }

    /// Set the object key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Require buckets to carry at least one lifecycle rule.
    pub fn with_lifecycle_required(mut self, required: bool) -> Self {
        self.require_lifecycle = required;
        self
    }

    /// Check if a bucket in `region` may appear in the report.
    pub fn region_allowed(&self, region: &str) -> bool {
        self.allowed_regions.is_empty() || self.allowed_regions.contains(region)
    }

    /// Whether the lifecycle check runs before listing.
    pub fn lifecycle_required(&self) -> bool {
        self.require_lifecycle
    }

    /// Key prefix handed verbatim to the object listing.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The allowed regions, in sorted order.
    pub fn allowed_regions(&self) -> impl Iterator<Item = &str> {
        self.allowed_regions.iter().map(String::as_str)
    }

    /// Report label for the region filter.
    pub fn regions_label(&self) -> String {
        if self.allowed_regions.is_empty() {
            NOT_APPLIED.to_string()
        } else {
            self.allowed_regions().collect::<Vec<_>>().join(",")
        }
    }

    /// Report label for the lifecycle filter.
    pub fn lifecycle_label(&self) -> &'static str {
        if self.require_lifecycle {
            "Applied"
        } else {
            NOT_APPLIED
        }
    }

    /// Report label for the prefix filter.
    pub fn prefix_label(&self) -> &str {
        if self.prefix.is_empty() {
            NOT_APPLIED
        } else {
            &self.prefix
        }
    }

    /// Get a human-readable description of this policy.
    ///
    /// Used for logging.
    pub fn description(&self) -> String {
        format!(
            "regions={} lifecycle={} prefix={}",
            self.regions_label(),
            self.lifecycle_label(),
            self.prefix_label()
        )
    }
}
