//! Replicate Summaries
//!
//! Mean and population standard deviation across replicates, computed per
//! `(r, pol)` point and per network kind. Infectious curves are truncated to
//! the shortest run of the group so every tick averages the same replicates.

use epi_events::{NetKind, ReplicateRecord, RunRecord};
use tracing::debug;

use crate::clustering::average_clustering;
use crate::AnalysisError;

/// Statistics of one network kind across a replicate group
#[derive(Debug, Clone, PartialEq)]
pub struct KindSummary {
    pub kind: NetKind,
    /// Mean infectious count per tick, up to the shortest run
    pub mean_infectious: Vec<f64>,
    pub std_infectious: Vec<f64>,
    /// Nodes ever infected
    pub mean_total_infected: f64,
    pub std_total_infected: f64,
    /// Average clustering of the final information network
    pub mean_clustering: f64,
    pub std_clustering: f64,
}

impl KindSummary {
    /// Number of ticks (including tick 0) covered by the curves.
    pub fn len(&self) -> usize {
        self.mean_infectious.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean_infectious.is_empty()
    }
}

/// Summary of every replicate sharing one `(r, pol)` point
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSummary {
    pub r: f64,
    pub pol: f64,
    pub replicates: usize,
    pub static_runs: KindSummary,
    pub dynamic_runs: KindSummary,
}

impl ParameterSummary {
    pub fn kind(&self, kind: NetKind) -> &KindSummary {
        match kind {
            NetKind::Static => &self.static_runs,
            NetKind::Dynamic => &self.dynamic_runs,
        }
    }
}

/// Mean and population standard deviation; `(0, 0)` for no values.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Exponential growth fit `I(t) = I0 * exp(G * t)` over `n_points` ticks from `start`.
///
/// Least squares on `ln I(t)`; ticks with no infectious nodes are skipped.
/// Returns `(I0, G)`, or `None` when fewer than two ticks are usable.
pub fn growth_rate(curve: &[f64], start: usize, n_points: usize) -> Option<(f64, f64)> {
    let end = start.saturating_add(n_points).min(curve.len());
    let points: Vec<(f64, f64)> = (start..end)
        .filter(|&t| curve[t] > 0.0)
        .map(|t| (t as f64, curve[t].ln()))
        .collect();
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_t = points.iter().map(|&(t, _)| t).sum::<f64>() / n;
    let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / n;
    let covariance: f64 = points.iter().map(|&(t, y)| (t - mean_t) * (y - mean_y)).sum();
    let spread: f64 = points.iter().map(|&(t, _)| (t - mean_t).powi(2)).sum();

    let g = covariance / spread;
    let i0 = (mean_y - g * mean_t).exp();
    Some((i0, g))
}

/// Basic reproduction number from a per-tick growth rate: `infectious_period * G + 1`.
pub fn estimate_r0(g: f64, infectious_period: f64) -> f64 {
    infectious_period * g + 1.0
}

fn summarize_kind(runs: &[&RunRecord], kind: NetKind) -> KindSummary {
    let horizon = runs.iter().map(|run| run.history.len()).min().unwrap_or(0);
    let (mean_infectious, std_infectious): (Vec<f64>, Vec<f64>) = (0..horizon)
        .map(|t| {
            let column: Vec<f64> = runs.iter().map(|run| run.history[t].infectious as f64).collect();
            mean_std(&column)
        })
        .unzip();

    let totals: Vec<f64> = runs.iter().map(|run| run.summary.total_infected as f64).collect();
    let clustering: Vec<f64> = runs
        .iter()
        .map(|run| average_clustering(run.summary.population, &run.final_information_edges))
        .collect();
    let (mean_total_infected, std_total_infected) = mean_std(&totals);
    let (mean_clustering, std_clustering) = mean_std(&clustering);

    KindSummary {
        kind,
        mean_infectious,
        std_infectious,
        mean_total_infected,
        std_total_infected,
        mean_clustering,
        std_clustering,
    }
}

/// Summarizes one replicate group. `r` and `pol` are taken from the first record.
pub fn summarize(records: &[ReplicateRecord]) -> Result<ParameterSummary, AnalysisError> {
    let refs: Vec<&ReplicateRecord> = records.iter().collect();
    summarize_group(&refs)
}

fn summarize_group(records: &[&ReplicateRecord]) -> Result<ParameterSummary, AnalysisError> {
    let first = records.first().ok_or(AnalysisError::EmptyReplicates)?;
    let runs_of = |kind: NetKind| records.iter().map(|rec| rec.run(kind)).collect::<Vec<_>>();

    let summary = ParameterSummary {
        r: first.r,
        pol: first.pol,
        replicates: records.len(),
        static_runs: summarize_kind(&runs_of(NetKind::Static), NetKind::Static),
        dynamic_runs: summarize_kind(&runs_of(NetKind::Dynamic), NetKind::Dynamic),
    };
    debug!(
        r = summary.r,
        pol = summary.pol,
        replicates = summary.replicates,
        "summarized replicate group"
    );
    Ok(summary)
}

/// Groups records by `(r, pol)` in order of first appearance and summarizes each group.
pub fn summarize_grid(records: &[ReplicateRecord]) -> Result<Vec<ParameterSummary>, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyReplicates);
    }
    let mut groups: Vec<((f64, f64), Vec<&ReplicateRecord>)> = Vec::new();
    for record in records {
        let key = (record.r, record.pol);
        match groups.iter().position(|(k, _)| *k == key) {
            Some(i) => groups[i].1.push(record),
            None => groups.push((key, vec![record])),
        }
    }
    groups
        .iter()
        .map(|(_, members)| summarize_group(members))
        .collect()
}
