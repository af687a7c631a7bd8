//! Last-modified filtering.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::Filter;
use crate::ObjectDescriptor;

/// A filter that keeps objects modified at or after a threshold.
///
/// The boundary is inclusive: an object whose last-modified time equals the
/// threshold passes.
///
/// # Example
///
/// ```
/// use at_scanner::filter::{DateFilter, Filter};
/// use at_scanner::ObjectDescriptor;
/// use chrono::{TimeZone, Utc};
///
/// let threshold = Utc.with_ymd_and_hms(2022, 5, 3, 0, 0, 0).unwrap();
/// let filter = DateFilter::new(threshold);
///
/// assert!(filter.matches(&ObjectDescriptor::new("a.json", threshold, 2)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    threshold: DateTime<Utc>,
}

impl DateFilter {
    /// Create a filter with the given inclusive lower bound.
    pub fn new(threshold: DateTime<Utc>) -> Self {
        Self { threshold }
    }

    /// Check whether a modification time passes.
    pub fn matches_time(&self, last_modified: DateTime<Utc>) -> bool {
        last_modified >= self.threshold
    }

    /// The configured threshold.
    pub fn threshold(&self) -> DateTime<Utc> {
        self.threshold
    }
}

impl Filter for DateFilter {
    fn matches(&self, obj: &ObjectDescriptor) -> bool {
        self.matches_time(obj.last_modified)
    }

    fn description(&self) -> String {
        format!(
            "modified_since({})",
            self.threshold.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Parse a threshold string.
///
/// Supported formats:
/// - RFC 3339: `2022-05-03T10:30:00Z`, `2022-05-03T12:30:00+02:00`
/// - Date only: `2022-05-03` (00:00:00 UTC)
/// - Relative: `-24h`, `-7d`, `-2w` (hours/days/weeks before now)
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();

    if let Some(relative) = input.strip_prefix('-') {
        return parse_relative(relative);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| format!("Invalid date: {input}"));
    }

    Err(format!(
        "Invalid date format: {input}. Expected RFC 3339 (2022-05-03T10:30:00Z), \
         date only (2022-05-03), or relative (-24h, -7d, -2w)"
    ))
}

fn parse_relative(input: &str) -> Result<DateTime<Utc>, String> {
    let Some(unit) = input.chars().last() else {
        return Err("Empty relative date".to_string());
    };
    let amount = &input[..input.len() - unit.len_utf8()];

    let amount: i64 = amount
        .parse()
        .map_err(|_| format!("Invalid number in relative date: '{amount}'"))?;

    let duration = match unit.to_ascii_lowercase() {
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        'w' => Duration::try_weeks(amount),
        _ => {
            return Err(format!(
                "Invalid relative date unit '{unit}'. Use 'h' (hours), 'd' (days), or 'w' (weeks)"
            ));
        }
    }
    .ok_or_else(|| format!("Relative date out of range: -{input}"))?;

    Utc::now()
        .checked_sub_signed(duration)
        .ok_or_else(|| format!("Relative date out of range: -{input}"))
}
