//! Folding an object listing into per-bucket statistics.

use bc_types::{BucketRef, BucketSummary, ObjectRecord};
use chrono::{DateTime, Utc};

use crate::filter::FilterPolicy;

/// Usage statistics for one bucket, before the bucket identity is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateFragment {
    /// Region the bucket lives in
    pub region: String,

    /// Number of objects counted
    pub file_count: u64,

    /// Sum of object sizes in bytes
    pub total_size: u64,

    /// Most recent modification time, none for an empty listing
    pub last_modified: Option<DateTime<Utc>>,
}

impl AggregateFragment {
    /// An empty fragment for `region`.
    pub fn empty(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            file_count: 0,
            total_size: 0,
            last_modified: None,
        }
    }

    /// Fold one object into the fragment.
    pub fn record(&mut self, object: &ObjectRecord) {
        self.file_count += 1;
        self.total_size = self.total_size.saturating_add(object.size);
        self.last_modified = Some(match self.last_modified {
            Some(current) => current.max(object.last_modified),
            None => object.last_modified,
        });
    }

    /// Attach the bucket identity, producing a summary.
    pub fn into_summary(self, bucket: &BucketRef, truncated: bool) -> BucketSummary {
        BucketSummary {
            name: bucket.name.clone(),
            creation_time: bucket.creation_time,
            region: self.region,
            file_count: self.file_count,
            total_size: self.total_size,
            last_modified: self.last_modified,
            truncated,
        }
    }
}

/// Reduce a bucket's objects into a fragment, or `None` if the region is filtered out.
///
/// The region check comes first, so a filtered bucket is dropped
/// regardless of what it holds.
pub fn aggregate<'a, I>(
    objects: I,
    region: &str,
    policy: &FilterPolicy,
) -> Option<AggregateFragment>
where
    I: IntoIterator<Item = &'a ObjectRecord>,
{
    if !policy.region_allowed(region) {
        return None;
    }

    let mut fragment = AggregateFragment::empty(region);
    for object in objects {
        fragment.record(object);
    }
    Some(fragment)
}
