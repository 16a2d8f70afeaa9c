//! Mapping SDK failures onto storage errors.

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use bc_error::StorageError;

/// Service error code returned when a bucket has no lifecycle configuration.
pub const NO_LIFECYCLE_CODE: &str = "NoSuchLifecycleConfiguration";

/// Service error codes that signal throttling or temporary unavailability.
const THROTTLING_CODES: &[&str] = &[
    "SlowDown",
    "Throttling",
    "ThrottlingException",
    "TooManyRequests",
    "RequestLimitExceeded",
];

/// Service error codes for server-side faults worth trying again later.
const SERVER_FAULT_CODES: &[&str] = &["InternalError", "ServiceUnavailable", "RequestTimeout"];

/// Service error codes S3 returns when a bucket is addressed through the
/// wrong regional endpoint.
const WRONG_REGION_CODES: &[&str] = &["PermanentRedirect", "AuthorizationHeaderMalformed"];

/// The storage call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StorageCall {
    ListBuckets,
    BucketRegion,
    ListObjects,
    Lifecycle,
}

/// Check if an SDK error means "no lifecycle configuration".
pub(crate) fn is_no_lifecycle<E, R>(err: &SdkError<E, R>) -> bool
where
    E: ProvideErrorMetadata,
{
    service_code(err) == Some(NO_LIFECYCLE_CODE)
}

/// Check if an SDK error means the bucket lives in another region.
pub(crate) fn is_wrong_region<E, R>(err: &SdkError<E, R>) -> bool
where
    E: ProvideErrorMetadata,
{
    service_code(err).is_some_and(|code| WRONG_REGION_CODES.contains(&code))
}

fn service_code<E, R>(err: &SdkError<E, R>) -> Option<&str>
where
    E: ProvideErrorMetadata,
{
    err.as_service_error().and_then(|e| e.code())
}

/// Convert an SDK error for `bucket` into a [`StorageError`].
///
/// Classification uses the error's structured service code and SDK
/// variant only. Timeouts, dispatch failures and unreadable responses
/// become [`StorageError::Connection`], throttling codes become
/// [`StorageError::Throttled`], server faults become
/// [`StorageError::Unavailable`], and anything else is reported against
/// the call that failed.
pub(crate) fn storage_error<E, R>(
    call: StorageCall,
    bucket: &str,
    err: SdkError<E, R>,
) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let message = DisplayErrorContext(&err).to_string();

    if call == StorageCall::ListBuckets {
        return StorageError::ListBuckets(message);
    }

    let bucket = bucket.to_string();

    if matches!(
        err,
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_)
    ) {
        return StorageError::Connection { bucket, message };
    }

    match service_code(&err) {
        Some(code) if THROTTLING_CODES.contains(&code) => {
            return StorageError::Throttled { bucket, message };
        }
        Some(code) if SERVER_FAULT_CODES.contains(&code) => {
            return StorageError::Unavailable { bucket, message };
        }
        _ => {}
    }

    match call {
        StorageCall::BucketRegion => StorageError::Region { bucket, message },
        StorageCall::ListObjects => StorageError::ListObjects { bucket, message },
        StorageCall::Lifecycle | StorageCall::ListBuckets => {
            StorageError::Lifecycle { bucket, message }
        }
    }
}

/// Normalise a `GetBucketLocation` constraint into a region name.
///
/// An empty constraint means `us-east-1`; the legacy `EU` constraint means
/// `eu-west-1`.
pub(crate) fn normalize_location(constraint: Option<&str>) -> String {
    match constraint {
        None | Some("") => super::client::DEFAULT_REGION.to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(region) => region.to_string(),
    }
}
