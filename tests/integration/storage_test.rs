//! S3 storage adapter integration tests using LocalStack.

use bc_integration_tests::{LocalStackTestContext, unique_bucket_name};
use bc_scanner::S3Storage;
use bc_traits::StorageApi;

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_list_buckets_includes_created_bucket() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_bucket_name("listing");
    ctx.create_bucket(&bucket).await.unwrap();

    let storage = S3Storage::connect(&ctx.s3_config()).await;
    let buckets = storage.list_buckets().await.unwrap();

    let found = buckets.iter().find(|b| b.name == bucket).unwrap();
    assert!(found.creation_time.is_some());
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_list_objects_sums_and_reports_region() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = unique_bucket_name("objects");
    ctx.create_bucket(&bucket).await.unwrap();
    ctx.put_object(&bucket, "logs/a", 10).await.unwrap();
    ctx.put_object(&bucket, "logs/b", 20).await.unwrap();
    ctx.put_object(&bucket, "data/c", 30).await.unwrap();

    let storage = S3Storage::connect(&ctx.s3_config()).await;

    let all = storage.list_objects(&bucket, "").await.unwrap();
    assert_eq!(all.objects.len(), 3);
    assert_eq!(all.objects.iter().map(|o| o.size).sum::<u64>(), 60);
    assert_eq!(all.region, "us-east-1");
    assert!(!all.truncated);

    let logs = storage.list_objects(&bucket, "logs/").await.unwrap();
    assert_eq!(logs.objects.len(), 2);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_lifecycle_absent_and_present() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let plain = unique_bucket_name("plain");
    let managed = unique_bucket_name("managed");
    ctx.create_bucket(&plain).await.unwrap();
    ctx.create_bucket(&managed).await.unwrap();
    ctx.put_lifecycle(&managed).await.unwrap();

    let storage = S3Storage::connect(&ctx.s3_config()).await;

    assert_eq!(storage.lifecycle_configuration(&plain).await.unwrap(), None);

    let lifecycle = storage
        .lifecycle_configuration(&managed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lifecycle.rule_count, 1);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_bucket_is_an_error() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let storage = S3Storage::connect(&ctx.s3_config()).await;

    let result = storage
        .list_objects(&unique_bucket_name("missing"), "")
        .await;
    assert!(result.is_err());
}
