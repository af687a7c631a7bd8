//! Output implementations for extracted records.
//!
//! This module provides the [`Output`] trait and [`StdoutOutput`], which writes
//! records to stdout as human-readable lines or JSONL.

mod stdout;

pub use stdout::{OutputFormat, StdoutOutput};

use async_trait::async_trait;
use at_error::Result;

use crate::ExtractedRecord;

/// Trait for delivering extracted records.
///
/// Records are emitted one at a time, immediately after extraction.
#[async_trait]
pub trait Output: Send + Sync {
    /// Emit a single record.
    async fn emit(&self, record: &ExtractedRecord) -> Result<()>;

    /// Flush any buffered output.
    ///
    /// Called once after the last record has been emitted.
    async fn flush(&self) -> Result<()>;
}
