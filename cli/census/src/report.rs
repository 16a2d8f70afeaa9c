//! Report rendering: fixed-width table or JSON.

use std::fmt::Write;

use anyhow::Result;
use bc_cli_common::{format_bytes, format_number, format_timestamp};
use bc_scanner::{BucketFailure, FilterPolicy, ScanReport};
use bc_types::{BucketSummary, CostFigure};
use serde::Serialize;

use crate::args::OutputFormatArg;

/// Width between the outer table borders.
const TABLE_WIDTH: usize = 150;

/// Marker appended to the name of a bucket whose listing was truncated.
const TRUNCATED_MARKER: &str = "*";

/// Rendering options.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormatArg,
    pub human_readable: bool,
}

/// Render the report in the requested format.
pub fn render(
    report: &ScanReport,
    policy: &FilterPolicy,
    options: RenderOptions,
) -> Result<String> {
    match options.format {
        OutputFormatArg::Table => Ok(render_table(report, policy, options.human_readable)),
        OutputFormatArg::Json => render_json(report, policy),
    }
}

fn rule(label: &str) -> String {
    format!("|{:-^width$}|", label, width = TABLE_WIDTH)
}

fn render_table(report: &ScanReport, policy: &FilterPolicy, human_readable: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule(" Header "));
    let _ = writeln!(
        out,
        "|Filters:  Regions: {:^56} | Life Cycle: {:^11} | Prefix: {:^37} |",
        policy.regions_label(),
        policy.lifecycle_label(),
        policy.prefix_label()
    );
    let _ = writeln!(
        out,
        "|Buckets Found:  {:<59} | S3 total cost in last month: {:<43}|",
        report.summaries.len(),
        report.cost.to_string()
    );
    let _ = writeln!(out, "{}", rule(""));

    let size_header = if human_readable { "Size" } else { "Size (B)" };
    let _ = writeln!(
        out,
        "{}",
        row(
            "Bucket Name",
            "Region",
            "Creation Date (UTC)",
            "Last Modified (UTC)",
            "Number of Files",
            size_header
        )
    );
    let _ = writeln!(out, "{}", rule(""));

    for summary in &report.summaries {
        let _ = writeln!(out, "{}", summary_row(summary, human_readable));
    }
    let _ = writeln!(out, "{}", rule(""));

    let mut footer = Vec::new();
    if report.summaries.iter().any(|s| s.truncated) {
        footer.push(format!(
            "{TRUNCATED_MARKER} Listing truncated, counts cover the first page only"
        ));
    }
    if report.has_failures() {
        footer.push(format!(
            "Failed Buckets: {} (details on stderr)",
            report.stats.failure_count()
        ));
    }
    if !footer.is_empty() {
        for line in footer {
            let _ = writeln!(out, "|{:<width$}|", line, width = TABLE_WIDTH);
        }
        let _ = writeln!(out, "{}", rule(""));
    }

    out
}

fn row(
    name: &str,
    region: &str,
    created: &str,
    modified: &str,
    files: &str,
    size: &str,
) -> String {
    format!("|{name:64}|{region:^14}|{created:^21}|{modified:^21}|{files:^15}|{size:^10}|")
}

fn summary_row(summary: &BucketSummary, human_readable: bool) -> String {
    let name = if summary.truncated {
        format!("{}{TRUNCATED_MARKER}", summary.name)
    } else {
        summary.name.clone()
    };

    let (files, size) = if human_readable {
        (
            format_number(summary.file_count),
            format_bytes(summary.total_size),
        )
    } else {
        (summary.file_count.to_string(), summary.total_size.to_string())
    };

    row(
        &name,
        &summary.region,
        &format_timestamp(summary.creation_time),
        &format_timestamp(summary.last_modified),
        &files,
        &size,
    )
}

#[derive(Serialize)]
struct JsonFilters<'a> {
    regions: Vec<&'a str>,
    life_cycle: bool,
    prefix: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    filters: JsonFilters<'a>,
    bucket_count: usize,
    cost: &'a CostFigure,
    buckets: &'a [BucketSummary],
    failures: &'a [BucketFailure],
}

fn render_json(report: &ScanReport, policy: &FilterPolicy) -> Result<String> {
    let json = JsonReport {
        filters: JsonFilters {
            regions: policy.allowed_regions().collect(),
            life_cycle: policy.lifecycle_required(),
            prefix: policy.prefix(),
        },
        bucket_count: report.summaries.len(),
        cost: &report.cost,
        buckets: &report.summaries,
        failures: &report.stats.failures,
    };

    let mut rendered = serde_json::to_string_pretty(&json)?;
    rendered.push('\n');
    Ok(rendered)
}
