//! Statistics over finished replicate runs.
//!
//! Consumes the replicate records written by `vaxnet` and reduces them to
//! per-parameter summaries: mean and spread of the infectious curve, of the
//! attack size and of the clustering of the final information network, for
//! static and rewired runs separately.
//!
//! ```text
//! ┌──────────┐  replicates.jsonl  ┌──────────────┐  SIR_simulation.csv
//! │  vaxnet  │ ─────────────────▶ │ epi-analysis │ ───────────────────▶
//! └──────────┘                    └──────────────┘
//! ```

use std::fs;
use std::path::Path;

use epi_events::ReplicateRecord;
use thiserror::Error;

pub mod clustering;
pub mod csv;
pub mod summary;

pub use clustering::{average_clustering, local_clustering};
pub use csv::{summary_rows, CsvWriter, CSV_HEADER};
pub use summary::{
    estimate_r0, growth_rate, mean_std, summarize, summarize_grid, KindSummary, ParameterSummary,
};

/// Errors that can occur while reading or summarizing replicates.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no replicates to summarize")]
    EmptyReplicates,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a JSONL file of replicate records, skipping blank lines.
pub fn read_replicates(path: impl AsRef<Path>) -> Result<Vec<ReplicateRecord>, AnalysisError> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            ReplicateRecord::from_jsonl(line).map_err(|source| AnalysisError::Parse {
                line: i + 1,
                source,
            })
        })
        .collect()
}
