//! S3-backed storage capability.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::types::Object;
use bc_error::StorageError;
use bc_traits::StorageApi;
use bc_types::{BucketRef, LifecycleConfiguration, ObjectListing, ObjectRecord};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, trace};

use super::client::{S3Config, build_s3_client, load_sdk_config};
use super::error::{
    StorageCall, is_no_lifecycle, is_wrong_region, normalize_location, storage_error,
};

/// Response header naming the region a bucket lives in.
pub const BUCKET_REGION_HEADER: &str = "x-amz-bucket-region";

/// Receives the bucket region from a raw response.
#[derive(Debug, Clone, Default)]
struct RegionSlot(Arc<Mutex<Option<String>>>);

impl RegionSlot {
    /// Response hook storing the region header, if the response carries one.
    fn hook(&self) -> impl Fn(&mut HttpResponse) + Send + Sync + 'static {
        let slot = Arc::clone(&self.0);
        move |resp: &mut HttpResponse| {
            if let Some(region) = resp.headers().get(BUCKET_REGION_HEADER) {
                if let Ok(mut slot) = slot.lock() {
                    *slot = Some(region.to_string());
                }
            }
        }
    }

    fn take(&self) -> Option<String> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Object storage capability backed by S3.
///
/// Every bucket call reads the bucket's region off the response header
/// and caches it, so later calls for the same bucket go straight to a
/// client for that region. When S3 answers with a wrong-region error the
/// call is sent once more through the region the error names.
/// `GetBucketLocation` is used only when a listing carries no region
/// header.
pub struct S3Storage {
    sdk_config: SdkConfig,
    client: Client,
    custom_endpoint: bool,
    bucket_regions: RwLock<HashMap<String, String>>,
    regional_clients: RwLock<HashMap<String, Client>>,
}

impl S3Storage {
    /// Create a storage capability from loaded AWS configuration.
    ///
    /// With a custom endpoint every call goes through the one client
    /// and path-style addressing is used.
    pub fn new(sdk_config: SdkConfig, custom_endpoint: bool) -> Self {
        let client = build_s3_client(&sdk_config, None, custom_endpoint);
        Self {
            sdk_config,
            client,
            custom_endpoint,
            bucket_regions: RwLock::new(HashMap::new()),
            regional_clients: RwLock::new(HashMap::new()),
        }
    }

    /// Load AWS configuration and create a storage capability.
    pub async fn connect(config: &S3Config) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self::new(sdk_config, config.uses_custom_endpoint())
    }

    /// Resolve a bucket's region with `GetBucketLocation`, using the cache
    /// first.
    pub async fn locate_bucket(&self, bucket: &str) -> Result<String, StorageError> {
        if let Some(region) = self.cached_region(bucket) {
            trace!(bucket = %bucket, region = %region, "Region cache hit");
            return Ok(region);
        }

        let resp = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| storage_error(StorageCall::BucketRegion, bucket, e))?;

        let region = normalize_location(resp.location_constraint().map(|c| c.as_str()));
        debug!(bucket = %bucket, region = %region, "Located bucket");
        self.remember_region(bucket, &region);

        Ok(region)
    }

    fn cached_region(&self, bucket: &str) -> Option<String> {
        self.bucket_regions
            .read()
            .ok()
            .and_then(|cache| cache.get(bucket).cloned())
    }

    fn remember_region(&self, bucket: &str, region: &str) {
        if let Ok(mut cache) = self.bucket_regions.write() {
            cache.insert(bucket.to_string(), region.to_string());
        }
    }

    /// A client addressed to `region`.
    fn client_for(&self, region: &str) -> Client {
        if self.custom_endpoint {
            return self.client.clone();
        }

        if let Some(client) = self
            .regional_clients
            .read()
            .ok()
            .and_then(|clients| clients.get(region).cloned())
        {
            return client;
        }

        let client = build_s3_client(&self.sdk_config, Some(region), false);
        if let Ok(mut clients) = self.regional_clients.write() {
            clients
                .entry(region.to_string())
                .or_insert_with(|| client.clone());
        }
        client
    }

    /// Send a bucket call through the best known client for `bucket`.
    ///
    /// Returns the output together with the bucket region, when the
    /// response or the cache knows it. A wrong-region error that names
    /// the bucket's region is retried once through that region.
    async fn in_bucket_region<T, E, F, Fut>(
        &self,
        bucket: &str,
        call: F,
    ) -> Result<(T, Option<String>), SdkError<E, HttpResponse>>
    where
        E: ProvideErrorMetadata,
        F: Fn(Client, RegionSlot) -> Fut,
        Fut: Future<Output = Result<T, SdkError<E, HttpResponse>>>,
    {
        let cached = self.cached_region(bucket);
        let client = match cached.as_deref() {
            Some(region) => self.client_for(region),
            None => self.client.clone(),
        };

        let slot = RegionSlot::default();
        let result = call(client, slot.clone()).await;
        let reported = slot.take();
        if let Some(region) = reported.as_deref() {
            self.remember_region(bucket, region);
        }

        match result {
            Err(err) if is_wrong_region(&err) => {
                let Some(region) = reported.filter(|r| cached.as_deref() != Some(r.as_str()))
                else {
                    return Err(err);
                };
                debug!(bucket = %bucket, region = %region, "Following region redirect");
                call(self.client_for(&region), RegionSlot::default())
                    .await
                    .map(|output| (output, Some(region)))
            }
            result => result.map(|output| (output, reported.or(cached))),
        }
    }
}

#[async_trait]
impl StorageApi for S3Storage {
    async fn list_buckets(&self) -> Result<Vec<BucketRef>, StorageError> {
        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| storage_error(StorageCall::ListBuckets, "", e))?;

        let buckets: Vec<BucketRef> = resp
            .buckets()
            .iter()
            .filter_map(|b| {
                let name = b.name()?;
                let creation_time = b
                    .creation_date()
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()));
                Some(BucketRef::new(name, creation_time))
            })
            .collect();

        debug!(bucket_count = buckets.len(), "Listed buckets");
        Ok(buckets)
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<ObjectListing, StorageError> {
        // A single page only; continuation tokens are not followed.
        let (resp, region) = self
            .in_bucket_region(bucket, move |client, slot| async move {
                let mut req = client.list_objects_v2().bucket(bucket);
                if !prefix.is_empty() {
                    req = req.prefix(prefix);
                }
                req.customize().mutate_response(slot.hook()).send().await
            })
            .await
            .map_err(|e| storage_error(StorageCall::ListObjects, bucket, e))?;

        let region = match region {
            Some(region) => region,
            None => self.locate_bucket(bucket).await?,
        };

        let objects: Vec<ObjectRecord> = resp.contents().iter().map(object_record).collect();
        let truncated = resp.is_truncated() == Some(true);

        debug!(
            bucket = %bucket,
            region = %region,
            object_count = objects.len(),
            truncated,
            "Listed objects"
        );

        Ok(ObjectListing {
            objects,
            region,
            truncated,
        })
    }

    async fn lifecycle_configuration(
        &self,
        bucket: &str,
    ) -> Result<Option<LifecycleConfiguration>, StorageError> {
        let result = self
            .in_bucket_region(bucket, move |client, slot| async move {
                client
                    .get_bucket_lifecycle_configuration()
                    .bucket(bucket)
                    .customize()
                    .mutate_response(slot.hook())
                    .send()
                    .await
            })
            .await;

        match result {
            Ok((resp, _)) => Ok(Some(LifecycleConfiguration {
                rule_count: resp.rules().len(),
            })),
            Err(e) if is_no_lifecycle(&e) => Ok(None),
            Err(e) => Err(storage_error(StorageCall::Lifecycle, bucket, e)),
        }
    }
}

/// Convert a listed object into a record.
///
/// Objects without a timestamp are counted at the Unix epoch.
fn object_record(obj: &Object) -> ObjectRecord {
    let last_modified = obj
        .last_modified()
        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    ObjectRecord {
        size: u64::try_from(obj.size().unwrap_or(0)).unwrap_or(0),
        last_modified,
    }
}
