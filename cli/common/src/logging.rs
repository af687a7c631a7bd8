//! Logging initialization utilities.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::LogLevel;

/// AWS SDK crates logged at `warn` unless `RUST_LOG` says otherwise.
const QUIET_TARGETS: &[&str] = &[
    "aws_config",
    "aws_smithy_runtime",
    "aws_smithy_runtime_api",
    "aws_sdk_s3",
    "hyper",
    "hyper_util",
    "rustls",
];

/// Build the filter for a log level.
///
/// `RUST_LOG` takes precedence when set and valid.
pub fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut directives = vec![level.as_directive().to_string()];
        directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));
        EnvFilter::new(directives.join(","))
    })
}

/// Initialize logging with the specified level.
///
/// Logs are written to stderr so stdout carries only extracted records.
pub fn init_logging(level: LogLevel) -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}
