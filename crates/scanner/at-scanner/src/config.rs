//! Configuration types for a scan run.

use at_error::ErrorPolicy;
use serde::{Deserialize, Serialize};

/// Name of the JSON field extracted when none is configured.
pub const DEFAULT_FIELD: &str = "attribute";

/// Configuration for a scan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Top-level JSON field to extract from every matched object
    pub field: String,

    /// What to do when a single object cannot be downloaded or parsed
    pub error_policy: ErrorPolicy,

    /// Maximum number of records to extract (0 = unlimited)
    pub max_records: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            field: DEFAULT_FIELD.to_string(),
            error_policy: ErrorPolicy::Abort,
            max_records: 0,
        }
    }
}

impl ScanConfig {
    /// Create a new scan configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field to extract.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Set the per-object error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the maximum number of records to extract.
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }
}
