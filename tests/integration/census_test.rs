//! End-to-end census runs against LocalStack.

use bc_integration_tests::{LocalStackTestContext, StaticCost, unique_bucket_name};
use bc_scanner::{FilterPolicy, S3Storage, ScanConfig, ScanOrchestrator, ScanReport};
use bc_types::BucketSummary;

/// Seed bucket A (three objects, no lifecycle) and bucket B (one object, lifecycle).
async fn seed(ctx: &LocalStackTestContext, label: &str) -> (String, String) {
    let a = unique_bucket_name(&format!("{label}-a"));
    let b = unique_bucket_name(&format!("{label}-b"));

    ctx.create_bucket(&a).await.unwrap();
    ctx.put_object(&a, "logs/1", 10).await.unwrap();
    ctx.put_object(&a, "logs/2", 20).await.unwrap();
    ctx.put_object(&a, "data/3", 30).await.unwrap();

    ctx.create_bucket(&b).await.unwrap();
    ctx.put_object(&b, "x", 5).await.unwrap();
    ctx.put_lifecycle(&b).await.unwrap();

    (a, b)
}

async fn census(ctx: &LocalStackTestContext, policy: FilterPolicy) -> ScanReport {
    let storage = S3Storage::connect(&ctx.s3_config()).await;
    let config = ScanConfig::new().with_max_concurrent_scans(4);
    let orchestrator = ScanOrchestrator::new(storage, StaticCost::storage(1.25), policy, config);
    orchestrator.run().await.unwrap()
}

fn find<'a>(report: &'a ScanReport, name: &str) -> Option<&'a BucketSummary> {
    report.summaries.iter().find(|s| s.name == name)
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_census_without_filters() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let (a, b) = seed(&ctx, "all").await;

    let report = census(&ctx, FilterPolicy::new()).await;

    let a = find(&report, &a).unwrap();
    assert_eq!(a.file_count, 3);
    assert_eq!(a.total_size, 60);
    assert!(a.last_modified.is_some());

    let b = find(&report, &b).unwrap();
    assert_eq!(b.file_count, 1);
    assert_eq!(b.total_size, 5);

    assert_eq!(report.cost.to_string(), "1.25 USD");
    assert!(report.summaries.windows(2).all(|w| w[0].name <= w[1].name));
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_census_lifecycle_required() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let (a, b) = seed(&ctx, "lifecycle").await;

    let report = census(&ctx, FilterPolicy::new().with_lifecycle_required(true)).await;

    assert!(find(&report, &a).is_none());
    assert!(find(&report, &b).is_some());
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_census_region_and_prefix() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let (a, _) = seed(&ctx, "prefix").await;

    let excluded = census(&ctx, FilterPolicy::new().with_region_list("us-west-2")).await;
    assert!(find(&excluded, &a).is_none());

    let policy = FilterPolicy::new()
        .with_region_list("us-east-1")
        .with_prefix("logs/");
    let report = census(&ctx, policy).await;

    let a = find(&report, &a).unwrap();
    assert_eq!(a.file_count, 2);
    assert_eq!(a.total_size, 30);
}
