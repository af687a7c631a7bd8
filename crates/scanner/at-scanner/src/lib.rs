//! at-scanner - S3 attribute scanning for attrscan.
//!
//! This crate lists the objects of a bucket, keeps those modified at or after
//! a threshold, downloads each match and extracts one string field from its
//! JSON content. It provides:
//!
//! - An [`ObjectStore`] abstraction with an S3 implementation and an in-memory one
//! - Paginated listing as a lazy stream of [`ObjectDescriptor`]
//! - Date filtering with an inclusive lower bound
//! - Typed JSON field extraction
//! - Output to stdout as text lines or JSONL
//!
//! # Example
//!
//! ```ignore
//! use at_scanner::{DateFilter, S3Config, S3Store, ScanConfig, Scanner, StdoutOutput};
//! use at_scanner::filter::parse_date;
//!
//! let client = at_scanner::create_s3_client(&S3Config::new().with_region("us-east-1")).await?;
//! let store = S3Store::new(client);
//!
//! let filter = DateFilter::new(parse_date("2022-05-03")?);
//! let config = ScanConfig::new().with_field("attribute");
//!
//! let scanner = Scanner::new(store, "my-bucket", filter, StdoutOutput::default(), config);
//! let stats = scanner.scan().await?;
//! eprintln!("Extracted {} records", stats.records_extracted);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod extract;
pub mod filter;
pub mod list;
pub mod output;
pub mod scanner;
pub mod stats;
pub mod store;

pub use at_error::{ErrorPolicy, Result, ScanError};
pub use config::ScanConfig;
pub use extract::extract_field;
pub use filter::{DateFilter, Filter, MatchAllFilter, select_matching};
pub use list::list_objects;
pub use output::{Output, OutputFormat, StdoutOutput};
pub use scanner::Scanner;
pub use stats::ScanStats;
pub use store::{ListPage, MemoryStore, ObjectStore, S3Config, S3Store, create_s3_client};

/// Metadata for one object returned by a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// The object key, unique within the bucket
    pub key: String,

    /// Last modified timestamp
    pub last_modified: DateTime<Utc>,

    /// Size of the object in bytes
    pub size: u64,
}

impl ObjectDescriptor {
    /// Create a new descriptor.
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>, size: u64) -> Self {
        Self {
            key: key.into(),
            last_modified,
            size,
        }
    }
}

/// A field value extracted from an object's JSON content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Key of the object the value was read from
    pub key: String,

    /// The string value of the configured field
    pub value: String,
}
