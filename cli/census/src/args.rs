//! CLI argument definitions for bucket-census.

use bc_cli_common::LogLevel;
use bc_scanner::config::{DEFAULT_MAX_CONCURRENT_SCANS, DEFAULT_TIMEOUT_SECS};
use clap::{Parser, ValueEnum};

/// Inventory every S3 bucket in the account.
///
/// Reports per-bucket file count, total size, last modification time and
/// region, together with the account's S3 cost over the last month.
///
/// ## Examples
///
/// All buckets:
///   bucket-census
///
/// Only buckets in two regions that carry lifecycle rules:
///   bucket-census --regions us-east-1,us-east-2 --life-cycle
///
/// Only keys under a prefix, as JSON:
///   bucket-census --prefix logs/ --output-format json
#[derive(Parser, Debug)]
#[command(name = "bucket-census")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Filters ===
    /// Comma-separated regions to keep (e.g. "us-east-1,us-east-2")
    #[arg(long, env = "BC_REGIONS")]
    pub regions: Option<String>,

    /// Only report buckets that have at least one lifecycle rule
    #[arg(long = "life-cycle")]
    pub life_cycle: bool,

    /// Only count keys under this prefix (e.g. "logs/")
    #[arg(long, env = "BC_PREFIX")]
    pub prefix: Option<String>,

    // === Parallelism Options ===
    /// Maximum bucket scans in flight at once (must be >= 1)
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_SCANS, value_parser = parse_positive_usize)]
    pub concurrency: usize,

    /// Timeout for each storage call, in seconds (must be >= 1)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = parse_positive_u64)]
    pub timeout_secs: u64,

    // === AWS Configuration ===
    /// AWS region for account-level calls
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "BC_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Custom Cost Explorer endpoint URL
    #[arg(long, env = "BC_COST_ENDPOINT")]
    pub cost_endpoint: Option<String>,

    // === Output Options ===
    /// Report format
    #[arg(long, value_enum, default_value = "table")]
    pub output_format: OutputFormatArg,

    /// Show sizes and counts in human-readable form in the table
    #[arg(long)]
    pub human_readable: bool,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Fixed-width table
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}

/// Parse a positive u64 (>= 1).
fn parse_positive_u64(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}
