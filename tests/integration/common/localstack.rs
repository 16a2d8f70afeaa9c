//! LocalStack test context and utilities.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::types::{
    BucketLifecycleConfiguration, ExpirationStatus, LifecycleExpiration, LifecycleRule,
    LifecycleRuleFilter,
};
use bc_error::CostError;
use bc_scanner::S3Config;
use bc_traits::CostApi;
use bc_types::{CostWindow, DailyCost, STORAGE_SERVICE, ServiceCost};
use chrono::Utc;

/// LocalStack test context providing an S3 client.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.clone()))
            .endpoint_url(&endpoint)
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                "test", "test", None, None, "localstack",
            ))
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Self {
            s3: S3Client::from_conf(s3_config),
            endpoint,
            region,
        }
    }

    /// Storage configuration pointing the census at LocalStack.
    pub fn s3_config(&self) -> S3Config {
        S3Config::new()
            .with_endpoint(&self.endpoint)
            .with_region(&self.region)
            .with_credentials("test", "test")
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        // Listing buckets fails fast when LocalStack is not running
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Create an S3 bucket for testing.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Upload an object of `size` bytes.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        size: usize,
    ) -> Result<(), aws_sdk_s3::Error> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(vec![b'x'; size].into())
            .send()
            .await?;
        Ok(())
    }

    /// Attach a single expiration rule to a bucket.
    pub async fn put_lifecycle(
        &self,
        bucket: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let rule = LifecycleRule::builder()
            .id("expire-old")
            .status(ExpirationStatus::Enabled)
            .filter(LifecycleRuleFilter::builder().prefix("").build())
            .expiration(LifecycleExpiration::builder().days(30).build())
            .build()?;

        let configuration = BucketLifecycleConfiguration::builder()
            .rules(rule)
            .build()?;

        self.s3
            .put_bucket_lifecycle_configuration()
            .bucket(bucket)
            .lifecycle_configuration(configuration)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;
        Ok(())
    }
}

/// Bucket name unique to this test run.
pub fn unique_bucket_name(label: &str) -> String {
    format!("census-{}-{}", label, Utc::now().timestamp_millis())
}

/// Billing capability answering every query with the same entries.
///
/// LocalStack does not serve Cost Explorer, so integration runs price the
/// month from canned data.
pub struct StaticCost {
    entries: Vec<DailyCost>,
}

impl StaticCost {
    /// A single day of object-storage spend.
    pub fn storage(amount: f64) -> Self {
        Self {
            entries: vec![DailyCost {
                start: Utc::now().date_naive(),
                groups: vec![ServiceCost {
                    keys: vec![STORAGE_SERVICE.to_string()],
                    amount,
                    unit: "USD".to_string(),
                }],
            }],
        }
    }
}

#[async_trait]
impl CostApi for StaticCost {
    async fn daily_service_costs(
        &self,
        _window: &CostWindow,
    ) -> Result<Vec<DailyCost>, CostError> {
        Ok(self.entries.clone())
    }
}
