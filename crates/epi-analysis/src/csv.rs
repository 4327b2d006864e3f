//! CSV Output
//!
//! One `mean` and one `std` row per tick and network kind, static rows first.
//! The `ar` column holds the attack size (nodes ever infected) truncated to
//! an integer; `cc` is the average clustering of the final information network.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use epi_events::NetKind;

use crate::summary::{KindSummary, ParameterSummary};

pub const CSV_HEADER: &str = "time,I,pol,r,ar,cc,kind,net_type";

fn kind_rows(summary: &ParameterSummary, kind: &KindSummary, rows: &mut Vec<String>) {
    let net_type = kind.kind.as_str();
    for (t, (mean, std)) in kind.mean_infectious.iter().zip(&kind.std_infectious).enumerate() {
        rows.push(format!(
            "{},{:.2},{:.1},{:.1},{},{:.3},mean,{}",
            t,
            mean,
            summary.pol,
            summary.r,
            kind.mean_total_infected.trunc() as u64,
            kind.mean_clustering,
            net_type
        ));
        rows.push(format!(
            "{},{:.2},{:.1},{:.1},{},{:.3},std,{}",
            t,
            std,
            summary.pol,
            summary.r,
            kind.std_total_infected.trunc() as u64,
            kind.std_clustering,
            net_type
        ));
    }
}

/// All CSV rows of one parameter summary, without the header.
pub fn summary_rows(summary: &ParameterSummary) -> Vec<String> {
    let mut rows = Vec::new();
    for kind in [NetKind::Static, NetKind::Dynamic] {
        kind_rows(summary, summary.kind(kind), &mut rows);
    }
    rows
}

/// Writes summaries as CSV rows under a single header line
pub struct CsvWriter<W: Write> {
    writer: W,
    row_count: u64,
}

impl CsvWriter<BufWriter<File>> {
    /// Creates (or truncates) `path`, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", CSV_HEADER)?;
        Ok(Self {
            writer,
            row_count: 0,
        })
    }

    /// Appends the rows of `summary`; returns how many were written.
    pub fn write_summary(&mut self, summary: &ParameterSummary) -> io::Result<usize> {
        let rows = summary_rows(summary);
        for row in &rows {
            writeln!(self.writer, "{}", row)?;
        }
        self.row_count += rows.len() as u64;
        Ok(rows.len())
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
