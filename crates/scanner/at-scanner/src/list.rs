//! Paginated object listing.

use async_stream::try_stream;
use at_error::{Result, ScanError};
use futures::Stream;
use tracing::trace;

use crate::ObjectDescriptor;
use crate::store::ObjectStore;

/// List every object in a bucket.
///
/// Returns a lazy stream of [`ObjectDescriptor`] items that follows the
/// continuation token page by page until the store signals the last page.
/// Pages may be any size, including empty. Order is whatever the store
/// returns. The first failed page request ends the stream with that error.
///
/// # Example
///
/// ```ignore
/// use futures::{StreamExt, pin_mut};
///
/// let stream = list_objects(&store, "my-bucket");
/// pin_mut!(stream);
///
/// while let Some(result) = stream.next().await {
///     let obj = result?;
///     println!("Found: {} ({} bytes)", obj.key, obj.size);
/// }
/// ```
pub fn list_objects<'a, S>(
    store: &'a S,
    bucket: &'a str,
) -> impl Stream<Item = Result<ObjectDescriptor>> + 'a
where
    S: ObjectStore + ?Sized,
{
    try_stream! {
        let mut continuation_token: Option<String> = None;
        let mut page_number = 0usize;

        loop {
            let page = store.list_page(bucket, continuation_token.as_deref()).await?;
            trace!(
                bucket = bucket,
                page = page_number,
                objects = page.objects.len(),
                "Received listing page"
            );

            for obj in page.objects {
                yield obj;
            }

            match page.next_token {
                Some(token) if continuation_token.as_deref() == Some(token.as_str()) => {
                    Err::<(), _>(ScanError::List(format!(
                        "continuation token '{token}' repeated after page {page_number}"
                    )))?;
                }
                Some(token) => continuation_token = Some(token),
                None => break,
            }

            page_number += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ListPage, MemoryStore};
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::{DateTime, Utc};
    use futures::{StreamExt, TryStreamExt};
    use std::collections::HashSet;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    fn store_with(count: usize) -> MemoryStore {
        let mut store = MemoryStore::new();
        for i in 0..count {
            store.insert(format!("obj-{i:03}.json"), ts(i as i64), "{}");
        }
        store
    }

    async fn collect_keys<S: ObjectStore>(store: &S) -> Vec<String> {
        list_objects(store, "bucket")
            .map_ok(|obj| obj.key)
            .try_collect()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_empty_bucket() {
        let store = MemoryStore::new();

        assert!(collect_keys(&store).await.is_empty());
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_follows_every_page() {
        for page_size in [1, 2, 3, 7, 10, 1000] {
            let store = store_with(10).with_page_size(page_size);
            let keys = collect_keys(&store).await;

            assert_eq!(keys.len(), 10, "page_size={page_size}");
            let unique: HashSet<_> = keys.iter().collect();
            assert_eq!(unique.len(), 10, "page_size={page_size}");
            assert_eq!(store.list_calls(), 10usize.div_ceil(page_size));
        }
    }

    #[tokio::test]
    async fn test_list_uneven_and_empty_pages() {
        let store = store_with(6).with_page_sizes(vec![0, 3, 0, 1, 2, 0]);
        let keys = collect_keys(&store).await;

        assert_eq!(
            keys,
            (0..6).map(|i| format!("obj-{i:03}.json")).collect::<Vec<_>>()
        );
        assert_eq!(store.list_calls(), 6);
    }

    #[tokio::test]
    async fn test_list_failure_ends_stream() {
        let store = store_with(5)
            .with_page_size(2)
            .with_list_failure_at_page(1);

        let results: Vec<_> = list_objects(&store, "bucket").collect().await;

        // Two objects from the first page, then the error
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(results[2], Err(ScanError::List(_))));
        assert_eq!(store.list_calls(), 2);
    }

    struct StuckStore;

    #[async_trait]
    impl ObjectStore for StuckStore {
        async fn list_page(&self, _bucket: &str, _token: Option<&str>) -> Result<ListPage> {
            Ok(ListPage {
                objects: vec![ObjectDescriptor::new("same.json", ts(0), 2)],
                next_token: Some("again".to_string()),
            })
        }

        async fn get_object(&self, _bucket: &str, _key: &str) -> Result<Bytes> {
            Ok(Bytes::from_static(b"{}"))
        }
    }

    #[tokio::test]
    async fn test_list_rejects_repeated_token() {
        let results: Vec<_> = list_objects(&StuckStore, "bucket").collect().await;

        assert_eq!(results.len(), 3);
        assert!(results[..2].iter().all(|r| r.is_ok()));
        assert!(matches!(results[2], Err(ScanError::List(_))));
    }
}
