//! Main execution logic for the bucket-census CLI.

use anyhow::Result;
use bc_scanner::{
    CostExplorer, CostExplorerConfig, FilterPolicy, S3Config, S3Storage, ScanConfig,
    ScanOrchestrator, ScanReport, create_cost_client,
};
use tracing::debug;

use crate::args::Cli;

/// Build the filter policy from CLI arguments.
pub fn build_policy(args: &Cli) -> FilterPolicy {
    let mut policy = FilterPolicy::new().with_lifecycle_required(args.life_cycle);

    if let Some(regions) = &args.regions {
        policy = policy.with_region_list(regions);
    }

    if let Some(prefix) = &args.prefix {
        policy = policy.with_prefix(prefix);
    }

    policy
}

/// Build the scan configuration from CLI arguments.
pub fn build_scan_config(args: &Cli) -> ScanConfig {
    ScanConfig::new()
        .with_max_concurrent_scans(args.concurrency)
        .with_timeout_secs(args.timeout_secs)
}

fn build_s3_config(args: &Cli) -> S3Config {
    let mut s3_config = S3Config::new();

    if let Some(region) = &args.region {
        s3_config = s3_config.with_region(region);
    }

    if let Some(endpoint) = &args.s3_endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }

    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }

    s3_config
}

fn build_cost_config(args: &Cli) -> CostExplorerConfig {
    let mut cost_config = CostExplorerConfig::new();

    if let Some(endpoint) = &args.cost_endpoint {
        cost_config = cost_config.with_endpoint(endpoint);
    }

    if let Some(profile) = &args.profile {
        cost_config = cost_config.with_profile(profile);
    }

    cost_config
}

/// Execute the census with the provided arguments.
pub async fn execute(args: &Cli, policy: FilterPolicy) -> Result<ScanReport> {
    let s3_config = build_s3_config(args);
    let storage = S3Storage::connect(&s3_config).await;

    let cost_client = create_cost_client(&build_cost_config(args)).await?;
    let cost = CostExplorer::new(cost_client);

    let config = build_scan_config(args);
    debug!(
        concurrency = config.max_concurrent_scans,
        timeout_secs = config.timeout_secs,
        custom_endpoint = s3_config.uses_custom_endpoint(),
        "Starting bucket-census"
    );

    let orchestrator = ScanOrchestrator::new(storage, cost, policy, config);
    let report = orchestrator.run().await?;
    Ok(report)
}
