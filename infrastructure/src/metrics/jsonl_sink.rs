//! JSONL file writer for per-query metrics records.
//!
//! Each [`QueryMetricsRecord`] is serialized as a single JSON line and
//! appended to the file via a buffered writer. Existing records are kept
//! across restarts.

use quorum_application::{MetricsSink, QueryMetricsRecord};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Append-only JSONL metrics sink.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Every line is flushed as it is
/// written; concurrent queries never interleave within a line.
pub struct JsonlMetricsSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlMetricsSink {
    /// Open (or create) the metrics file for appending.
    ///
    /// Creates parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the metrics file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetricsSink for JsonlMetricsSink {
    fn record(&self, record: &QueryMetricsRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize metrics record {}: {}", record.query_id, e);
                return;
            }
        };

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!(
                "Could not append metrics record to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl Drop for JsonlMetricsSink {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}
