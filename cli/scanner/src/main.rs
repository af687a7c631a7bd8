//! attrscan CLI
//!
//! Extracts one JSON field from every S3 object modified since a threshold.

use at_cli_common::{format_bytes, format_count, format_duration, init_logging};
use clap::Parser;

mod args;
mod run;

use args::Cli;

/// Exit status when the scan finished but skipped objects.
const EXIT_PARTIAL_FAILURE: i32 = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr, stdout carries only records
    init_logging(args.log_level)?;

    let stats = run::execute(args).await?;

    eprintln!();
    eprintln!("Scan completed:");
    eprintln!("  Objects listed:    {}", format_count(stats.objects_listed));
    eprintln!("  Objects filtered:  {}", format_count(stats.objects_filtered));
    eprintln!("  Objects matched:   {}", format_count(stats.objects_matched));
    eprintln!("  Records extracted: {}", format_count(stats.records_extracted));
    eprintln!("  Objects skipped:   {}", format_count(stats.objects_skipped));
    eprintln!("  Bytes downloaded:  {}", format_bytes(stats.bytes_downloaded));

    if let Some(duration) = stats.duration().and_then(|d| d.to_std().ok()) {
        eprintln!("  Duration:          {}", format_duration(duration));

        if let Some(rps) = stats.records_per_second() {
            eprintln!("  Throughput:        {rps:.1} records/sec");
        }
    }

    if stats.has_errors() {
        for error in &stats.errors {
            eprintln!("  Error: {error}");
        }
        std::process::exit(EXIT_PARTIAL_FAILURE);
    }

    Ok(())
}
