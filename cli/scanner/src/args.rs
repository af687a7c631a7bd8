//! CLI argument definitions for attrscan.

use at_cli_common::LogLevel;
use at_scanner::{ErrorPolicy, OutputFormat};
use clap::{Parser, ValueEnum};

/// Extract a JSON field from recently modified S3 objects.
///
/// Lists every object in the bucket, keeps those modified at or after
/// `--modified-since`, downloads each one, parses it as a JSON object and
/// prints the string value of `--field`.
///
/// ## Examples
///
/// Basic usage:
///   attrscan -b my-bucket --modified-since 2022-05-03
///
/// Last week's objects, a different field, JSONL output:
///   attrscan -b my-bucket -s -7d -f status --output-format jsonl
///
/// Keep going past malformed objects:
///   attrscan -b my-bucket --on-error skip
///
/// Against LocalStack:
///   attrscan -b my-bucket --s3-endpoint http://localhost:4566
#[derive(Parser, Debug)]
#[command(name = "attrscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === S3 Configuration ===
    /// S3 bucket name
    #[arg(short, long, env = "ATTRSCAN_BUCKET")]
    pub bucket: String,

    /// Custom S3 endpoint URL (for LocalStack or MinIO)
    #[arg(long, env = "ATTRSCAN_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region (falls back to the SDK default chain)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    // === Scan Options ===
    /// Only fetch objects modified at or after this time
    /// (RFC 3339, date only, or relative like -24h, -7d)
    #[arg(
        short = 's',
        long,
        env = "ATTRSCAN_MODIFIED_SINCE",
        default_value = "2022-05-03",
        allow_hyphen_values = true
    )]
    pub modified_since: String,

    /// Top-level JSON field to extract
    #[arg(short, long, env = "ATTRSCAN_FIELD", default_value = "attribute")]
    pub field: String,

    /// What to do when an object cannot be downloaded or parsed
    #[arg(long, value_enum, default_value = "abort")]
    pub on_error: OnErrorArg,

    /// Maximum number of records to extract (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_records: usize,

    // === Output Options ===
    /// Output format for extracted records
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormatArg,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Per-object error handling argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnErrorArg {
    /// Stop at the first failure
    Abort,
    /// Log and skip failed objects, exit with status 4 if any were skipped
    Skip,
}

impl From<OnErrorArg> for ErrorPolicy {
    fn from(arg: OnErrorArg) -> Self {
        match arg {
            OnErrorArg::Abort => ErrorPolicy::Abort,
            OnErrorArg::Skip => ErrorPolicy::Skip,
        }
    }
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// "Found attribute value '<value>' in object '<key>'"
    Text,
    /// JSON Lines (one JSON object per line)
    Jsonl,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Jsonl => OutputFormat::Jsonl,
        }
    }
}
