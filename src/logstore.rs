//! Append-only prompt log.
//!
//! One CSV file, all fields quoted, one row per successful generation.
//! The header is written exactly once, on the first startup that finds
//! no existing file; subsequent startups leave the file untouched.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};
use tokio::sync::Mutex;

use crate::error::GatewayError;

const HEADER: [&str; 6] = [
    "timestamp",
    "model",
    "prompt",
    "response",
    "token_count",
    "latency_ms",
];

/// One row of the prompt log.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: String,
    pub model: String,
    pub prompt: String,
    pub response: String,
    pub token_count: u32,
    pub latency_ms: f64,
}

/// Handle to the append-only log file.
///
/// Init-once, append-many: `open` creates the file and header if absent,
/// `append` takes the row lock so concurrent requests never interleave
/// partial rows. The file handle itself is opened and closed per append.
pub struct PromptLog {
    path: PathBuf,
    row_lock: Mutex<()>,
}

impl PromptLog {
    /// Open (and if necessary create) the log file at `path`.
    ///
    /// Idempotent across restarts: an existing file is never truncated
    /// and never gets a second header row.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            let file = File::create(&path)?;
            let mut writer = quoted_writer(file);
            writer.write_record(HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            row_lock: Mutex::new(()),
        })
    }

    /// Append one record, flattening any embedded newlines so the file
    /// stays one logical record per line.
    pub async fn append(&self, record: &LogRecord) -> Result<(), GatewayError> {
        let _guard = self.row_lock.lock().await;
        self.write_row(record)
            .map_err(|e| GatewayError::LogWriteFailed(e.to_string()))
    }

    fn write_row(&self, record: &LogRecord) -> anyhow::Result<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = quoted_writer(file);
        writer.write_record([
            record.timestamp.as_str(),
            record.model.as_str(),
            &flatten_newlines(&record.prompt),
            &flatten_newlines(&record.response),
            &record.token_count.to_string(),
            &record.latency_ms.to_string(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn quoted_writer(file: File) -> csv::Writer<File> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(file)
}

/// Replace newline characters with single spaces.
fn flatten_newlines(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}
