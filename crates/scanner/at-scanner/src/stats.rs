//! Statistics for scan runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Statistics collected during a scan run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// When the scan started
    pub started_at: Option<DateTime<Utc>>,

    /// When the scan completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Total number of objects listed (before filtering)
    pub objects_listed: usize,

    /// Number of objects that passed the filter
    pub objects_matched: usize,

    /// Number of objects rejected by the filter
    pub objects_filtered: usize,

    /// Number of records extracted and emitted
    pub records_extracted: usize,

    /// Number of matched objects skipped after an error
    pub objects_skipped: usize,

    /// Total bytes downloaded
    pub bytes_downloaded: u64,

    /// Errors recorded for skipped objects
    pub errors: Vec<String>,
}

impl ScanStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the scan as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record a listed object that passed the filter.
    pub fn record_matched(&mut self) {
        self.objects_listed += 1;
        self.objects_matched += 1;
    }

    /// Record a listed object that was filtered out.
    pub fn record_filtered(&mut self) {
        self.objects_listed += 1;
        self.objects_filtered += 1;
    }

    /// Record a completed download.
    pub fn record_download(&mut self, bytes: u64) {
        self.bytes_downloaded += bytes;
    }

    /// Record an emitted record.
    pub fn record_extracted(&mut self) {
        self.records_extracted += 1;
    }

    /// Record an object skipped because of an error.
    pub fn record_skipped(&mut self, error: impl ToString) {
        self.objects_skipped += 1;
        self.errors.push(error.to_string());
    }

    /// Get the duration of the scan.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Check if any object was skipped.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of recorded errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Calculate the throughput in records per second.
    pub fn records_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.records_extracted as f64 / secs
            } else {
                0.0
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_stats_new() {
        let stats = ScanStats::new();
        assert!(stats.started_at.is_some());
        assert!(stats.completed_at.is_none());
        assert_eq!(stats.objects_listed, 0);
    }

    #[test]
    fn test_stats_listing_counters() {
        let mut stats = ScanStats::new();
        stats.record_matched();
        stats.record_filtered();
        stats.record_filtered();

        assert_eq!(stats.objects_listed, 3);
        assert_eq!(stats.objects_matched, 1);
        assert_eq!(stats.objects_filtered, 2);
    }

    #[test]
    fn test_stats_downloads_and_records() {
        let mut stats = ScanStats::new();
        stats.record_download(1024);
        stats.record_download(2048);
        stats.record_extracted();

        assert_eq!(stats.bytes_downloaded, 3072);
        assert_eq!(stats.records_extracted, 1);
    }

    #[test]
    fn test_stats_skipped() {
        let mut stats = ScanStats::new();
        assert!(!stats.has_errors());

        stats.record_skipped("field 'attribute' is missing");
        assert!(stats.has_errors());
        assert_eq!(stats.error_count(), 1);
        assert_eq!(stats.objects_skipped, 1);
    }

    #[test]
    fn test_stats_duration() {
        let mut stats = ScanStats::new();
        assert!(stats.duration().is_none());

        sleep(StdDuration::from_millis(10));
        stats.complete();

        let duration = stats.duration().unwrap();
        assert!(duration.num_milliseconds() >= 10);
        assert!(stats.records_per_second().is_some());
    }
}
