//! S3 client and storage capability.
//!
//! This module provides:
//! - Client configuration with LocalStack support
//! - Bucket regions read from response headers, with regional clients
//! - Single-page object listing and lifecycle queries

mod client;
mod error;
mod storage;

pub use client::{DEFAULT_REGION, S3Config, build_s3_client, load_sdk_config};
pub use error::NO_LIFECYCLE_CODE;
pub use storage::{BUCKET_REGION_HEADER, S3Storage};
