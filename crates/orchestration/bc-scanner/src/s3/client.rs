//! S3 client configuration and creation.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::Client;
use serde::{Deserialize, Serialize};

/// Region assumed when none is configured or resolvable.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Configuration for S3 access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region used for account-level calls
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,

    /// Explicit AWS access key (optional)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional)
    pub secret_key: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,
}

impl S3Config {
    /// Create a new S3Config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Whether a custom endpoint is configured.
    pub fn uses_custom_endpoint(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Load the shared AWS configuration for S3 access.
pub async fn load_sdk_config(config: &S3Config) -> SdkConfig {
    let region = config
        .region
        .clone()
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));

    // Set custom endpoint if provided (for LocalStack)
    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials = aws_sdk_s3::config::Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "bucket-census",
        );
        loader = loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    loader.load().await
}

/// Build an S3 client from loaded configuration, optionally pinned to `region`.
///
/// Path-style addressing is enabled when a custom endpoint is in use.
pub fn build_s3_client(sdk_config: &SdkConfig, region: Option<&str>, path_style: bool) -> Client {
    let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);

    if let Some(region) = region {
        builder = builder.region(Region::new(region.to_string()));
    }

    if path_style {
        builder = builder.force_path_style(true);
    }

    Client::from_conf(builder.build())
}
