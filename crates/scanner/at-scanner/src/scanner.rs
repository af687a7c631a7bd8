//! The scan pipeline: list, filter, then fetch and extract.

use at_error::{Result, ScanError};
use futures::{StreamExt, pin_mut};
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::extract::extract_field;
use crate::filter::Filter;
use crate::list::list_objects;
use crate::output::Output;
use crate::stats::ScanStats;
use crate::store::ObjectStore;
use crate::{ExtractedRecord, ObjectDescriptor};

/// Coordinates listing, filtering, download, extraction and output.
///
/// Generic over the store, filter and output so the same pipeline runs
/// against S3 or an in-memory store and writes to any destination.
/// Everything runs sequentially: the match set is complete before the first
/// download, and downloads never overlap.
pub struct Scanner<S: ObjectStore, F: Filter, O: Output> {
    store: S,
    bucket: String,
    filter: F,
    output: O,
    config: ScanConfig,
}

impl<S: ObjectStore, F: Filter, O: Output> Scanner<S, F, O> {
    /// Create a new Scanner.
    ///
    /// # Arguments
    ///
    /// * `store` - Where objects are listed and downloaded from
    /// * `bucket` - The bucket to scan
    /// * `filter` - Which listed objects to fetch
    /// * `output` - Where extracted records go
    /// * `config` - Field name, error policy and limits
    pub fn new(
        store: S,
        bucket: impl Into<String>,
        filter: F,
        output: O,
        config: ScanConfig,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            filter,
            output,
            config,
        }
    }

    /// The object store this scanner reads from.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the scan.
    ///
    /// Listing failures always abort. Download, parse and field errors abort
    /// under [`ErrorPolicy::Abort`](at_error::ErrorPolicy::Abort) and are
    /// recorded and skipped under [`ErrorPolicy::Skip`](at_error::ErrorPolicy::Skip).
    pub async fn scan(&self) -> Result<ScanStats> {
        let mut stats = ScanStats::new();

        info!(
            bucket = %self.bucket,
            field = %self.config.field,
            filter = %self.filter.description(),
            on_error = %self.config.error_policy,
            "Starting scan"
        );

        let matches = self.collect_matches(&mut stats).await?;

        info!(
            listed = stats.objects_listed,
            matched = stats.objects_matched,
            "Listing complete"
        );

        for obj in &matches {
            if self.config.max_records > 0 && stats.records_extracted >= self.config.max_records {
                debug!(max_records = self.config.max_records, "Reached max records limit");
                break;
            }

            match self.fetch_and_extract(obj, &mut stats).await {
                Ok(record) => {
                    self.output.emit(&record).await?;
                    stats.record_extracted();
                    debug!(key = %obj.key, size = obj.size, "Extracted record");
                }
                Err(e) if !self.config.error_policy.is_fatal(&e) => {
                    warn!(key = %obj.key, error = %e, "Skipping object");
                    stats.record_skipped(&e);
                }
                Err(e) => return Err(e),
            }
        }

        self.output.flush().await?;
        stats.complete();

        info!(
            records = stats.records_extracted,
            skipped = stats.objects_skipped,
            bytes = stats.bytes_downloaded,
            "Scan completed"
        );

        Ok(stats)
    }

    /// List the bucket and return the objects that pass the filter, in
    /// listing order.
    pub async fn match_set(&self) -> Result<Vec<ObjectDescriptor>> {
        let mut stats = ScanStats::new();
        self.collect_matches(&mut stats).await
    }

    async fn collect_matches(&self, stats: &mut ScanStats) -> Result<Vec<ObjectDescriptor>> {
        if self.bucket.is_empty() {
            return Err(ScanError::Config("bucket name must not be empty".to_string()));
        }

        let mut matches = Vec::new();

        let stream = list_objects(&self.store, &self.bucket);
        pin_mut!(stream);

        while let Some(result) = stream.next().await {
            let obj = result?;

            if self.filter.matches(&obj) {
                stats.record_matched();
                matches.push(obj);
            } else {
                stats.record_filtered();
                debug!(key = %obj.key, last_modified = %obj.last_modified, "Filtered out");
            }
        }

        Ok(matches)
    }

    async fn fetch_and_extract(
        &self,
        obj: &ObjectDescriptor,
        stats: &mut ScanStats,
    ) -> Result<ExtractedRecord> {
        let data = self.store.get_object(&self.bucket, &obj.key).await?;
        stats.record_download(data.len() as u64);

        extract_field(&obj.key, &data, &self.config.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DateFilter, MatchAllFilter};
    use crate::output::StdoutOutput;
    use crate::store::MemoryStore;
    use at_error::ErrorPolicy;
    use chrono::{DateTime, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_match_set_applies_filter() {
        let store = MemoryStore::new()
            .with_object("old", ts(10), "{}")
            .with_object("new", ts(30), "{}")
            .with_object("edge", ts(20), "{}")
            .with_page_size(1);

        let scanner = Scanner::new(
            store,
            "bucket",
            DateFilter::new(ts(20)),
            StdoutOutput::default(),
            ScanConfig::new(),
        );

        let keys: Vec<_> = scanner
            .match_set()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["new", "edge"]);
        assert_eq!(scanner.store().get_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_bucket_name_is_config_error() {
        let scanner = Scanner::new(
            MemoryStore::new(),
            "",
            MatchAllFilter,
            StdoutOutput::default(),
            ScanConfig::new(),
        );

        let err = scanner.scan().await.unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
        assert_eq!(scanner.store().list_calls(), 0);
    }

    #[tokio::test]
    async fn test_skip_policy_records_errors() {
        let store = MemoryStore::new()
            .with_object("bad", ts(1), "[]")
            .with_missing_object("gone", ts(1));

        let scanner = Scanner::new(
            store,
            "bucket",
            MatchAllFilter,
            StdoutOutput::default(),
            ScanConfig::new().with_error_policy(ErrorPolicy::Skip),
        );

        let stats = scanner.scan().await.unwrap();
        assert_eq!(stats.records_extracted, 0);
        assert_eq!(stats.objects_skipped, 2);
        assert_eq!(stats.bytes_downloaded, 2);
        assert!(stats.completed_at.is_some());
    }
}
