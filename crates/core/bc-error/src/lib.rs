//! Error types and classification for bucket-census.
//!
//! This crate provides:
//! - [`CensusError`] - Top-level error enum for a census run
//! - Domain-specific errors ([`StorageError`], [`CostError`])
//! - [`ErrorCategory`] for deciding how a per-bucket failure is reported
//! - Classification of storage errors by variant

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for bucket-census.
#[derive(Error, Debug)]
pub enum CensusError {
    /// Object storage errors (bucket listing, object listing, lifecycle)
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Billing API errors
    #[error("Cost error: {0}")]
    Cost(#[from] CostError),
}

/// Object storage errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The account's bucket list could not be fetched
    #[error("List buckets failed: {0}")]
    ListBuckets(String),

    /// The bucket's region could not be resolved
    #[error("Region lookup failed for {bucket}: {message}")]
    Region { bucket: String, message: String },

    /// Object listing failed
    #[error("List objects failed for {bucket}: {message}")]
    ListObjects { bucket: String, message: String },

    /// Lifecycle query failed for a reason other than "not configured"
    #[error("Lifecycle query failed for {bucket}: {message}")]
    Lifecycle { bucket: String, message: String },

    /// Request was throttled by the service
    #[error("Throttled on {bucket}: {message}")]
    Throttled { bucket: String, message: String },

    /// The service reported an internal or temporary server-side fault
    #[error("Service unavailable for {bucket}: {message}")]
    Unavailable { bucket: String, message: String },

    /// Connection could not be established or was dropped
    #[error("Connection failed for {bucket}: {message}")]
    Connection { bucket: String, message: String },

    /// Call did not complete within the configured timeout
    #[error("{operation} timed out after {secs}s for {bucket}")]
    Timeout {
        bucket: String,
        operation: String,
        secs: u64,
    },
}

/// Billing API errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CostError {
    /// The cost query itself failed
    #[error("Cost query failed: {0}")]
    Query(String),

    /// The cost query did not complete within the configured timeout
    #[error("Cost query timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The query window could not be built
    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    /// A returned amount could not be parsed
    #[error("Invalid cost amount '{0}'")]
    InvalidAmount(String),
}

/// Error classification for per-bucket failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Transient error - throttling, timeouts, connectivity
    Transient,

    /// Permanent error - access denied, wrong region, malformed request
    Permanent,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Permanent => write!(f, "permanent"),
        }
    }
}

/// Classifies a storage error by its variant.
///
/// Adapters map throttling, server faults and connectivity problems onto
/// dedicated variants from the service's structured error data, so the
/// error text is never inspected here.
pub fn classify_storage_error(error: &StorageError) -> ErrorCategory {
    match error {
        StorageError::Throttled { .. }
        | StorageError::Unavailable { .. }
        | StorageError::Connection { .. }
        | StorageError::Timeout { .. } => ErrorCategory::Transient,
        StorageError::ListBuckets(_)
        | StorageError::Region { .. }
        | StorageError::ListObjects { .. }
        | StorageError::Lifecycle { .. } => ErrorCategory::Permanent,
    }
}

/// Result type alias using CensusError.
pub type Result<T> = std::result::Result<T, CensusError>;
