//! Stdout output implementation for extracted records.

use std::io::Write;

use async_trait::async_trait;
use at_error::{Result, ScanError};
use serde::{Deserialize, Serialize};

use super::Output;
use crate::ExtractedRecord;

/// Output format for stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Found attribute value '<value>' in object '<key>'` (default)
    #[default]
    Text,

    /// JSON Lines format - one `{"key": ..., "value": ...}` object per line
    Jsonl,
}

/// Stdout output implementation.
///
/// Each record is written and flushed as soon as it is emitted, so records
/// appear before a later failure ends the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutOutput {
    format: OutputFormat,
}

impl StdoutOutput {
    /// Create a new StdoutOutput with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Create a StdoutOutput producing text lines.
    pub fn text() -> Self {
        Self::new(OutputFormat::Text)
    }

    /// Create a StdoutOutput producing JSON Lines.
    pub fn jsonl() -> Self {
        Self::new(OutputFormat::Jsonl)
    }

    /// Render a record as a single line without the trailing newline.
    pub fn render(&self, record: &ExtractedRecord) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(format!(
                "Found attribute value '{}' in object '{}'",
                record.value, record.key
            )),
            OutputFormat::Jsonl => serde_json::to_string(record)
                .map_err(|e| ScanError::Output(format!("JSON serialization failed: {e}"))),
        }
    }
}

#[async_trait]
impl Output for StdoutOutput {
    async fn emit(&self, record: &ExtractedRecord) -> Result<()> {
        let line = self.render(record)?;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")
            .and_then(|_| stdout.flush())
            .map_err(|e| ScanError::Output(format!("Failed to write to stdout: {e}")))
    }

    async fn flush(&self) -> Result<()> {
        std::io::stdout()
            .flush()
            .map_err(|e| ScanError::Output(format!("Failed to flush stdout: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ExtractedRecord {
        ExtractedRecord {
            key: "data/2022/obj.json".to_string(),
            value: "foo".to_string(),
        }
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
        assert_eq!(StdoutOutput::default().format, OutputFormat::Text);
    }

    #[test]
    fn test_render_text() {
        let line = StdoutOutput::text().render(&record()).unwrap();

        assert_eq!(
            line,
            "Found attribute value 'foo' in object 'data/2022/obj.json'"
        );
    }

    #[test]
    fn test_render_jsonl() {
        let line = StdoutOutput::jsonl().render(&record()).unwrap();

        assert!(!line.contains('\n'));
        let parsed: ExtractedRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, record());
    }

    #[test]
    fn test_render_jsonl_escapes_value() {
        let record = ExtractedRecord {
            key: "k".to_string(),
            value: "line\nbreak \"quoted\"".to_string(),
        };
        let line = StdoutOutput::jsonl().render(&record).unwrap();

        assert!(!line.contains('\n'));
        assert_eq!(line, r#"{"key":"k","value":"line\nbreak \"quoted\""}"#);
    }
}
