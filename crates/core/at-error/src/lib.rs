//! Error types and classification for attrscan.
//!
//! This crate provides:
//! - [`ScanError`] - Top-level error enum for every failure a scan can hit
//! - Domain-specific errors ([`DownloadError`], [`FieldError`])
//! - [`ErrorScope`] for deciding whether an error ends the run or only the object
//! - [`ErrorPolicy`] for choosing between aborting and skipping failed objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for attrscan.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration or credential resolution errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A listing page request failed
    #[error("Failed to list objects in bucket: {0}")]
    List(String),

    /// Downloading an object's content failed
    #[error("Failed to download object '{key}': {source}")]
    Download {
        key: String,
        #[source]
        source: DownloadError,
    },

    /// An object's content is not valid JSON
    #[error("Failed to parse JSON data in object '{key}': {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The parsed JSON does not have the expected shape
    #[error("Unexpected JSON shape in object '{key}': {source}")]
    Field {
        key: String,
        #[source]
        source: FieldError,
    },

    /// Writing an extracted record failed
    #[error("Output error: {0}")]
    Output(String),
}

/// Object download errors.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The object does not exist (deleted between listing and download)
    #[error("object not found")]
    NotFound,

    /// Credentials lack permission to read the object
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Network, transport or body streaming failure
    #[error("{0}")]
    Transfer(String),
}

/// JSON shape errors raised by field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The top-level JSON value is not an object
    #[error("top-level value is {found}, expected an object")]
    NotAnObject { found: &'static str },

    /// The field is absent from the top-level object
    #[error("field '{field}' is missing")]
    Missing { field: String },

    /// The field is present but is not a string
    #[error("field '{field}' is {found}, expected a string")]
    WrongType { field: String, found: &'static str },
}

/// Whether an error concerns the whole run or a single object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// The run cannot continue (credentials, listing, output)
    Run,

    /// Only the object being processed is affected
    Object,
}

impl ScanError {
    /// Build a download error for `key`.
    pub fn download(key: impl Into<String>, source: DownloadError) -> Self {
        Self::Download {
            key: key.into(),
            source,
        }
    }

    /// Build a JSON parse error for `key`.
    pub fn parse(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            key: key.into(),
            source,
        }
    }

    /// Build a field-shape error for `key`.
    pub fn field(key: impl Into<String>, source: FieldError) -> Self {
        Self::Field {
            key: key.into(),
            source,
        }
    }

    /// Classify this error by the extent of its damage.
    pub fn scope(&self) -> ErrorScope {
        match self {
            Self::Config(_) | Self::List(_) | Self::Output(_) => ErrorScope::Run,
            Self::Download { .. } | Self::Parse { .. } | Self::Field { .. } => ErrorScope::Object,
        }
    }
}

/// What to do when processing a single object fails.
///
/// Run-scoped errors always abort regardless of the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the whole run on the first failure
    #[default]
    Abort,

    /// Log the failure, record it, and continue with the next object
    Skip,
}

impl ErrorPolicy {
    /// Decide whether `error` should end the run under this policy.
    pub fn is_fatal(&self, error: &ScanError) -> bool {
        match (self, error.scope()) {
            (_, ErrorScope::Run) => true,
            (Self::Abort, ErrorScope::Object) => true,
            (Self::Skip, ErrorScope::Object) => false,
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!(
                "Invalid error policy '{other}'. Expected 'abort' or 'skip'"
            )),
        }
    }
}

/// Result type alias using ScanError.
pub type Result<T> = std::result::Result<T, ScanError>;
