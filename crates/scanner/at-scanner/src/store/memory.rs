//! In-memory object store.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use at_error::{DownloadError, Result, ScanError};
use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::{ListPage, ObjectStore};
use crate::ObjectDescriptor;

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug)]
struct StoredObject {
    descriptor: ObjectDescriptor,
    content: Option<Bytes>,
}

/// [`ObjectStore`] holding objects in process memory.
///
/// Objects are listed in insertion order, split into pages of `page_size`
/// (or by explicit page boundaries). The bucket argument is ignored.
/// Listing and download failures can be injected for testing error paths.
#[derive(Debug)]
pub struct MemoryStore {
    objects: Vec<StoredObject>,
    page_sizes: Vec<usize>,
    default_page_size: usize,
    fail_list_at_page: Option<usize>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store with the default page size.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            page_sizes: Vec::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
            fail_list_at_page: None,
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        }
    }

    /// Add an object with content (builder pattern).
    pub fn with_object(
        mut self,
        key: impl Into<String>,
        last_modified: DateTime<Utc>,
        content: impl Into<Bytes>,
    ) -> Self {
        self.insert(key, last_modified, content);
        self
    }

    /// Add an object.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        last_modified: DateTime<Utc>,
        content: impl Into<Bytes>,
    ) {
        let content = content.into();
        self.objects.push(StoredObject {
            descriptor: ObjectDescriptor::new(key, last_modified, content.len() as u64),
            content: Some(content),
        });
    }

    /// Add an object that is listed but whose download reports not-found.
    pub fn with_missing_object(
        mut self,
        key: impl Into<String>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        self.objects.push(StoredObject {
            descriptor: ObjectDescriptor::new(key, last_modified, 0),
            content: None,
        });
        self
    }

    /// Set a uniform page size (must be >= 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    /// Set explicit page sizes; zero-sized pages are allowed.
    ///
    /// Objects beyond the listed sizes fall back to the uniform page size.
    pub fn with_page_sizes(mut self, page_sizes: Vec<usize>) -> Self {
        self.page_sizes = page_sizes;
        self
    }

    /// Fail the listing request for the given zero-based page index.
    pub fn with_list_failure_at_page(mut self, page: usize) -> Self {
        self.fail_list_at_page = Some(page);
        self
    }

    /// Number of `list_page` calls served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_object` calls served so far.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Start offset and length of the page at `index`.
    fn page_bounds(&self, index: usize) -> (usize, usize) {
        let mut start = 0;
        for page in 0..index {
            start += self.page_len(page);
        }
        (start, self.page_len(index))
    }

    fn page_len(&self, index: usize) -> usize {
        self.page_sizes
            .get(index)
            .copied()
            .unwrap_or(self.default_page_size)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_page(&self, _bucket: &str, continuation_token: Option<&str>) -> Result<ListPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let index = match continuation_token {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ScanError::List(format!("invalid continuation token '{token}'")))?,
        };

        if self.fail_list_at_page == Some(index) {
            return Err(ScanError::List(format!(
                "injected failure listing page {index}"
            )));
        }

        let (start, len) = self.page_bounds(index);
        let start = start.min(self.objects.len());
        let end = (start + len).min(self.objects.len());

        let objects = self.objects[start..end]
            .iter()
            .map(|o| o.descriptor.clone())
            .collect();

        // Explicit page sizes may describe trailing empty pages
        let more = end < self.objects.len() || index + 1 < self.page_sizes.len();
        let next_token = more.then(|| (index + 1).to_string());

        Ok(ListPage {
            objects,
            next_token,
        })
    }

    async fn get_object(&self, _bucket: &str, key: &str) -> Result<Bytes> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        self.objects
            .iter()
            .find(|o| o.descriptor.key == key)
            .and_then(|o| o.content.clone())
            .ok_or_else(|| ScanError::download(key, DownloadError::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_single_page() {
        let store = MemoryStore::new()
            .with_object("a", ts(1), "{}")
            .with_object("b", ts(2), "{}");

        let page = store.list_page("bucket", None).await.unwrap();

        assert_eq!(page.objects.len(), 2);
        assert!(page.next_token.is_none());
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_uniform_pages() {
        let store = MemoryStore::new()
            .with_object("a", ts(1), "1")
            .with_object("b", ts(2), "2")
            .with_object("c", ts(3), "3")
            .with_page_size(2);

        let first = store.list_page("bucket", None).await.unwrap();
        assert_eq!(first.objects.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("1"));

        let second = store
            .list_page("bucket", first.next_token.as_deref())
            .await
            .unwrap();
        assert_eq!(second.objects.len(), 1);
        assert_eq!(second.objects[0].key, "c");
        assert!(second.next_token.is_none());
    }

    #[tokio::test]
    async fn test_memory_store_get_object() {
        let store = MemoryStore::new()
            .with_object("present", ts(1), r#"{"attribute":"x"}"#)
            .with_missing_object("gone", ts(1));

        let data = store.get_object("bucket", "present").await.unwrap();
        assert_eq!(&data[..], br#"{"attribute":"x"}"#);

        let err = store.get_object("bucket", "gone").await.unwrap_err();
        assert!(matches!(
            err,
            ScanError::Download {
                source: DownloadError::NotFound,
                ..
            }
        ));
        assert!(store.get_object("bucket", "unknown").await.is_err());
        assert_eq!(store.get_calls(), 3);
    }

    #[tokio::test]
    async fn test_memory_store_list_failure() {
        let store = MemoryStore::new()
            .with_object("a", ts(1), "{}")
            .with_list_failure_at_page(0);

        let err = store.list_page("bucket", None).await.unwrap_err();
        assert!(matches!(err, ScanError::List(_)));
    }

    #[test]
    fn test_memory_store_sizes_from_content() {
        let store = MemoryStore::new().with_object("a", ts(1), "12345");
        assert_eq!(store.objects[0].descriptor.size, 5);
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
