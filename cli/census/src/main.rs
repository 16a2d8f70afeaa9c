//! bucket-census CLI
//!
//! Inventory of every S3 bucket in an account, with usage statistics and
//! the trailing month's storage cost.

use bc_cli_common::{format_bytes, format_number, init_logging};
use clap::Parser;

mod args;
mod report;
mod run;

use args::Cli;
use report::RenderOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr; stdout carries only the report
    init_logging(args.log_level)?;

    let policy = run::build_policy(&args);
    let report = run::execute(&args, policy.clone()).await?;

    let options = RenderOptions {
        format: args.output_format,
        human_readable: args.human_readable,
    };
    print!("{}", report::render(&report, &policy, options)?);

    let stats = &report.stats;
    eprintln!();
    eprintln!("Census completed:");
    eprintln!("  Buckets listed:   {}", stats.buckets_listed);
    eprintln!("  Buckets reported: {}", stats.buckets_emitted);
    eprintln!("  Buckets dropped:  {}", stats.buckets_dropped());
    eprintln!("  Files counted:    {}", format_number(stats.files_counted));
    eprintln!("  Bytes counted:    {}", format_bytes(stats.bytes_counted));
    eprintln!("  Failures:         {}", stats.failure_count());

    if let Some(duration) = stats.duration() {
        eprintln!(
            "  Duration:         {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        );
    }

    if report.has_failures() {
        for failure in &stats.failures {
            eprintln!("  Failed: {}", failure);
        }
        std::process::exit(4); // Partial failure
    }

    Ok(())
}
