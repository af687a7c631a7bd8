//! Object storage access.
//!
//! The scanner talks to storage only through [`ObjectStore`]:
//! - [`S3Store`] - Amazon S3 or an S3-compatible endpoint such as LocalStack
//! - [`MemoryStore`] - In-process objects with configurable page size

mod memory;
mod s3;

pub use memory::MemoryStore;
pub use s3::{S3Config, S3Store, create_s3_client};

use async_trait::async_trait;
use at_error::Result;
use bytes::Bytes;

use crate::ObjectDescriptor;

/// One page of a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Descriptors on this page, in the order the store returned them
    pub objects: Vec<ObjectDescriptor>,

    /// Token for the next page, `None` when this is the last page
    pub next_token: Option<String>,
}

/// Trait for listing and reading objects in a bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one page of object descriptors.
    ///
    /// `continuation_token` is `None` for the first page and the previous
    /// page's `next_token` afterwards.
    async fn list_page(&self, bucket: &str, continuation_token: Option<&str>) -> Result<ListPage>;

    /// Download the full content of an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;
}
