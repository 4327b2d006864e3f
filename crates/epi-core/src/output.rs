//! Record Output
//!
//! Append-only JSONL logging of replicate records, and JSON output of single runs.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use epi_events::{ReplicateRecord, RunRecord};
use tracing::warn;

/// Writes replicate records to a JSONL file, one record per line
pub struct RecordLogger {
    writer: Option<BufWriter<File>>,
    record_count: u64,
}

impl RecordLogger {
    /// Create a new logger writing to the specified path, creating parent directories
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            record_count: 0,
        })
    }

    /// Create a logger that discards records (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            record_count: 0,
        }
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    pub fn log(&mut self, record: &ReplicateRecord) -> std::io::Result<()> {
        self.record_count += 1;
        if let Some(ref mut writer) = self.writer {
            let line = record.to_jsonl()?;
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }

    pub fn log_batch(&mut self, records: &[ReplicateRecord]) -> std::io::Result<()> {
        for record in records {
            self.log(record)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for RecordLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("failed to flush record logger: {}", e);
        }
    }
}

/// Reads every replicate record from a JSONL file, skipping blank lines.
pub fn read_records(path: impl AsRef<Path>) -> std::io::Result<Vec<ReplicateRecord>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| ReplicateRecord::from_jsonl(line).map_err(std::io::Error::from))
        .collect()
}

/// Writes a single run as pretty JSON.
pub fn write_run(path: impl AsRef<Path>, record: &RunRecord) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = record.to_json()?;
    fs::write(path, json)
}
