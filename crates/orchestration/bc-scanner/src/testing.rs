//! In-memory capability doubles for scanner tests.

use async_trait::async_trait;
use bc_error::{CostError, StorageError};
use bc_traits::{CostApi, StorageApi};
use bc_types::{
    BucketRef, CostWindow, DailyCost, LifecycleConfiguration, ObjectListing, ObjectRecord,
};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How a fake bucket answers the lifecycle query.
#[derive(Debug, Clone)]
pub enum FakeLifecycle {
    NotConfigured,
    Rules(usize),
    Fails(String),
}

/// A bucket held by [`FakeStorage`].
#[derive(Debug, Clone)]
pub struct FakeBucket {
    pub creation_time: Option<DateTime<Utc>>,
    pub region: String,
    pub objects: Vec<(String, ObjectRecord)>,
    pub lifecycle: FakeLifecycle,
    pub list_error: Option<String>,
    pub delay: Option<Duration>,
    pub truncated: bool,
}

impl FakeBucket {
    pub fn new(region: &str) -> Self {
        Self {
            creation_time: Some(ts(1)),
            region: region.to_string(),
            objects: Vec::new(),
            lifecycle: FakeLifecycle::NotConfigured,
            list_error: None,
            delay: None,
            truncated: false,
        }
    }

    pub fn with_object(mut self, key: &str, size: u64, day: u32) -> Self {
        self.objects
            .push((key.to_string(), ObjectRecord::new(size, ts(day))));
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: FakeLifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn with_list_error(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }
}

/// Timestamp on day `day` of January 2024.
pub fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

/// In-memory object storage that records how many listings run at once.
#[derive(Default)]
pub struct FakeStorage {
    buckets: BTreeMap<String, FakeBucket>,
    list_buckets_error: Option<String>,
    list_buckets_delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(mut self, name: &str, bucket: FakeBucket) -> Self {
        self.buckets.insert(name.to_string(), bucket);
        self
    }

    pub fn failing_list_buckets(mut self, message: &str) -> Self {
        self.list_buckets_error = Some(message.to_string());
        self
    }

    pub fn with_list_buckets_delay(mut self, delay: Duration) -> Self {
        self.list_buckets_delay = Some(delay);
        self
    }

    /// Highest number of concurrent `list_objects` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Calls made, as `"<operation>:<bucket>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, operation: &str, bucket: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation}:{bucket}"));
    }

    fn bucket(&self, name: &str) -> Result<&FakeBucket, StorageError> {
        self.buckets.get(name).ok_or_else(|| StorageError::ListObjects {
            bucket: name.to_string(),
            message: "NoSuchBucket".to_string(),
        })
    }
}

#[async_trait]
impl StorageApi for FakeStorage {
    async fn list_buckets(&self) -> Result<Vec<BucketRef>, StorageError> {
        if let Some(delay) = self.list_buckets_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.list_buckets_error {
            return Err(StorageError::ListBuckets(message.clone()));
        }
        Ok(self
            .buckets
            .iter()
            .map(|(name, b)| BucketRef::new(name.clone(), b.creation_time))
            .collect())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<ObjectListing, StorageError> {
        self.record_call("list_objects", bucket);
        let fake = self.bucket(bucket)?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = fake.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = &fake.list_error {
            return Err(StorageError::ListObjects {
                bucket: bucket.to_string(),
                message: message.clone(),
            });
        }

        Ok(ObjectListing {
            objects: fake
                .objects
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(_, obj)| *obj)
                .collect(),
            region: fake.region.clone(),
            truncated: fake.truncated,
        })
    }

    async fn lifecycle_configuration(
        &self,
        bucket: &str,
    ) -> Result<Option<LifecycleConfiguration>, StorageError> {
        self.record_call("lifecycle", bucket);
        match &self.bucket(bucket)?.lifecycle {
            FakeLifecycle::NotConfigured => Ok(None),
            FakeLifecycle::Rules(rule_count) => Ok(Some(LifecycleConfiguration {
                rule_count: *rule_count,
            })),
            FakeLifecycle::Fails(message) => Err(StorageError::Lifecycle {
                bucket: bucket.to_string(),
                message: message.clone(),
            }),
        }
    }
}

/// Billing double returning canned daily entries.
#[derive(Default)]
pub struct FakeCost {
    entries: Vec<DailyCost>,
    error: Option<String>,
    delay: Option<Duration>,
    windows: Mutex<Vec<CostWindow>>,
}

impl FakeCost {
    pub fn new(entries: Vec<DailyCost>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Windows the double was queried with.
    pub fn windows(&self) -> Vec<CostWindow> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl CostApi for FakeCost {
    async fn daily_service_costs(&self, window: &CostWindow) -> Result<Vec<DailyCost>, CostError> {
        self.windows.lock().unwrap().push(*window);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.error {
            Some(message) => Err(CostError::Query(message.clone())),
            None => Ok(self.entries.clone()),
        }
    }
}
