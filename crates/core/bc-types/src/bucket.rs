//! Bucket and object types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bucket as returned by the account-wide bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRef {
    /// Bucket name
    pub name: String,

    /// When the bucket was created (absent if the service omitted it)
    pub creation_time: Option<DateTime<Utc>>,
}

impl BucketRef {
    /// Create a bucket reference.
    pub fn new(name: impl Into<String>, creation_time: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            creation_time,
        }
    }
}

/// Size and modification time of a single stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Size of the object in bytes
    pub size: u64,

    /// Last modified timestamp
    pub last_modified: DateTime<Utc>,
}

impl ObjectRecord {
    /// Create an object record.
    pub fn new(size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            size,
            last_modified,
        }
    }
}

/// One page of a bucket's object listing.
///
/// The region is always present, even when the listing holds no objects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectListing {
    /// Objects in the page
    pub objects: Vec<ObjectRecord>,

    /// Region the bucket lives in
    pub region: String,

    /// Whether the service reported more objects than were returned
    pub truncated: bool,
}

/// Lifecycle configuration attached to a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfiguration {
    /// Number of lifecycle rules in the configuration
    pub rule_count: usize,
}

impl LifecycleConfiguration {
    /// Check if the configuration carries at least one rule.
    pub fn has_rules(&self) -> bool {
        self.rule_count > 0
    }
}

/// Per-bucket usage statistics.
///
/// Produced once per bucket that survives filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    /// Bucket name
    pub name: String,

    /// When the bucket was created
    pub creation_time: Option<DateTime<Utc>>,

    /// Region the bucket lives in
    pub region: String,

    /// Number of objects counted
    pub file_count: u64,

    /// Sum of the counted objects' sizes in bytes
    pub total_size: u64,

    /// Most recent modification time (none when no objects were counted)
    pub last_modified: Option<DateTime<Utc>>,

    /// Whether the counts cover only the first listing page
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl BucketSummary {
    /// Check if no objects were counted for the bucket.
    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }
}
