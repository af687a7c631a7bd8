//! Shared utilities for attrscan CLI binaries.
//!
//! This crate provides the pieces every attrscan binary needs: a log level
//! argument, logging setup that keeps stdout free for records, and number
//! formatting for run summaries.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_bytes, format_count, format_duration};
pub use logging::init_logging;
