//! Main execution logic for the attrscan CLI.

use anyhow::{Context, Result};
use at_scanner::filter::parse_date;
use at_scanner::{
    DateFilter, S3Config, S3Store, ScanConfig, ScanStats, Scanner, StdoutOutput, create_s3_client,
};
use tracing::debug;

use crate::args::Cli;

/// Build the S3 configuration from CLI arguments.
pub fn build_s3_config(args: &Cli) -> S3Config {
    let mut s3_config = S3Config::new();

    if let Some(region) = &args.region {
        s3_config = s3_config.with_region(region);
    }

    if let Some(endpoint) = &args.s3_endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        s3_config = s3_config.with_credentials(access_key, secret_key);
    }

    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }

    s3_config
}

/// Build the date filter from CLI arguments.
pub fn build_filter(args: &Cli) -> Result<DateFilter> {
    let threshold = parse_date(&args.modified_since)
        .map_err(|e| anyhow::anyhow!("Invalid --modified-since: {e}"))?;

    Ok(DateFilter::new(threshold))
}

/// Build the scan configuration from CLI arguments.
pub fn build_scan_config(args: &Cli) -> ScanConfig {
    ScanConfig::new()
        .with_field(&args.field)
        .with_error_policy(args.on_error.into())
        .with_max_records(args.max_records)
}

/// Execute a scan with the provided arguments.
pub async fn execute(args: Cli) -> Result<ScanStats> {
    let filter = build_filter(&args)?;
    let config = build_scan_config(&args);
    let s3_config = build_s3_config(&args);

    debug!(
        region = ?s3_config.region,
        endpoint = ?s3_config.endpoint,
        profile = ?s3_config.profile,
        "Creating S3 client"
    );
    let client = create_s3_client(&s3_config)
        .await
        .context("failed to create S3 client")?;

    let output = StdoutOutput::new(args.output_format.into());
    let scanner = Scanner::new(S3Store::new(client), &args.bucket, filter, output, config);

    let stats = scanner.scan().await?;
    Ok(stats)
}
