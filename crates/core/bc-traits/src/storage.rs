//! Object storage capability.

use async_trait::async_trait;
use bc_error::StorageError;
use bc_types::{BucketRef, LifecycleConfiguration, ObjectListing};
use std::sync::Arc;

/// Trait for object storage backends.
///
/// Implementations are shared read-only by every scan worker, so all
/// methods take `&self` and must be safe to call concurrently.
///
/// # Implementations
///
/// - S3: `bc_scanner::s3::S3Storage`
/// - In-memory fakes in tests
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Lists every bucket in the account.
    async fn list_buckets(&self) -> Result<Vec<BucketRef>, StorageError>;

    /// Lists a single page of objects in `bucket` whose keys start with `prefix`.
    ///
    /// The returned listing carries the bucket's region even when no
    /// objects match.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<ObjectListing, StorageError>;

    /// Fetches the bucket's lifecycle configuration.
    ///
    /// Returns `Ok(None)` only when the bucket has no lifecycle
    /// configuration. Every other failure is an error.
    async fn lifecycle_configuration(
        &self,
        bucket: &str,
    ) -> Result<Option<LifecycleConfiguration>, StorageError>;
}

#[async_trait]
impl<T: StorageApi + ?Sized> StorageApi for Arc<T> {
    async fn list_buckets(&self) -> Result<Vec<BucketRef>, StorageError> {
        (**self).list_buckets().await
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<ObjectListing, StorageError> {
        (**self).list_objects(bucket, prefix).await
    }

    async fn lifecycle_configuration(
        &self,
        bucket: &str,
    ) -> Result<Option<LifecycleConfiguration>, StorageError> {
        (**self).lifecycle_configuration(bucket).await
    }
}
