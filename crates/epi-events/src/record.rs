//! Run Records
//!
//! Serialization structs for finished runs and paired replicate runs,
//! used for analysis and downstream statistics.

use serde::{Deserialize, Serialize};

use crate::TickCounts;

/// Undirected edge between two node ids, stored with the smaller id first.
pub type Edge = (usize, usize);

/// Generates a replicate ID with the given sequence number.
pub fn generate_run_id(sequence: u64) -> String {
    format!("run_{:06}", sequence)
}

/// Whether the information network was rewired during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetKind {
    Static,
    Dynamic,
}

impl NetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetKind::Static => "static",
            NetKind::Dynamic => "dynamic",
        }
    }
}

/// Scalar results of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub population: usize,
    /// Number of ticks executed (excluding the initial tick 0)
    pub ticks: u64,
    /// Nodes infected at least once
    pub total_infected: usize,
    /// `total_infected / population`
    pub attack_rate: f64,
    pub rewiring: bool,
    /// Disagreement edges replaced over the whole run
    #[serde(default)]
    pub rewired_edges: u64,
}

/// A finished run: summary, per-tick history and final information network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub summary: RunSummary,
    /// Counts for tick 0 (initial state) through the final tick
    pub history: Vec<TickCounts>,
    /// Information network edges at termination, sorted
    pub final_information_edges: Vec<Edge>,
}

impl RunRecord {
    /// Infectious count per tick.
    pub fn infectious_curve(&self) -> Vec<usize> {
        self.history.iter().map(|c| c.infectious).collect()
    }

    /// Peak infectious count and the tick it occurred at.
    pub fn peak(&self) -> Option<(u64, usize)> {
        self.history
            .iter()
            .max_by_key(|c| (c.infectious, std::cmp::Reverse(c.tick)))
            .map(|c| (c.tick, c.infectious))
    }

    /// Serializes the record to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One replicate: the same graphs and seed sets run with a static and a
/// rewired information network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateRecord {
    pub run_id: String,
    pub seed: u64,
    pub r: f64,
    pub pol: f64,
    pub static_run: RunRecord,
    pub dynamic_run: RunRecord,
}

impl ReplicateRecord {
    /// Returns the run of the requested kind.
    pub fn run(&self, kind: NetKind) -> &RunRecord {
        match kind {
            NetKind::Static => &self.static_run,
            NetKind::Dynamic => &self.dynamic_run,
        }
    }

    /// Serializes the record as a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
