//! Filtering for listed objects.
//!
//! Provides the [`Filter`] trait the scanner is generic over and its
//! implementations:
//! - [`DateFilter`] - Keeps objects modified at or after a threshold
//! - [`MatchAllFilter`] - Keeps everything

mod date;

pub use date::{DateFilter, parse_date};

use crate::ObjectDescriptor;

/// Trait for deciding which listed objects are fetched.
pub trait Filter: Send + Sync {
    /// Check whether an object passes the filter.
    fn matches(&self, obj: &ObjectDescriptor) -> bool;

    /// A short human-readable description of the filter, for logging.
    fn description(&self) -> String;
}

/// A filter that matches all objects (no filtering).
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAllFilter;

impl Filter for MatchAllFilter {
    fn matches(&self, _obj: &ObjectDescriptor) -> bool {
        true
    }

    fn description(&self) -> String {
        "all".to_string()
    }
}

/// Keep the objects that pass `filter`, preserving their relative order.
pub fn select_matching<I, F>(objects: I, filter: &F) -> Vec<ObjectDescriptor>
where
    I: IntoIterator<Item = ObjectDescriptor>,
    F: Filter + ?Sized,
{
    objects.into_iter().filter(|obj| filter.matches(obj)).collect()
}
