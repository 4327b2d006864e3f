//! Sample data fixtures for testing.
//!
//! This module provides ready-made replicate records for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // epi-events = { path = "../epi-events", features = ["test-fixtures"] }
//!
//! use epi_events::fixtures;
//!
//! let replicates = fixtures::sample_replicates();
//! ```

use crate::{generate_run_id, Edge, ReplicateRecord, RunRecord, RunSummary, TickCounts};

/// Population of every fixture run.
pub const FIXTURE_POPULATION: usize = 10;

/// Builds a run record from an infectious curve.
///
/// Nodes leave the susceptible pool only by infection; recovered absorbs
/// whatever is no longer infectious.
pub fn run_from_curve(
    seed: u64,
    curve: &[usize],
    total_infected: usize,
    rewiring: bool,
    edges: Vec<Edge>,
) -> RunRecord {
    let history = curve
        .iter()
        .enumerate()
        .map(|(t, &infectious)| {
            let recovered = if t == 0 { 0 } else { total_infected.saturating_sub(infectious) };
            TickCounts {
                tick: t as u64,
                susceptible: FIXTURE_POPULATION - infectious - recovered,
                infectious,
                recovered,
                vaccinated: 0,
                pro_vax: 7,
                no_vax: 3,
                neutral: 0,
                information_edges: edges.len(),
            }
        })
        .collect();

    RunRecord {
        summary: RunSummary {
            seed,
            population: FIXTURE_POPULATION,
            ticks: curve.len().saturating_sub(1) as u64,
            total_infected,
            attack_rate: total_infected as f64 / FIXTURE_POPULATION as f64,
            rewiring,
            rewired_edges: 0,
        },
        history,
        final_information_edges: edges,
    }
}

/// Returns two replicates at `r = 0.5, pol = 0.5`.
///
/// - Static runs: a triangle information network (clustering 1.0 on three nodes)
/// - Dynamic runs: a path information network (clustering 0.0)
/// - Replicate 1 lasts longer than replicate 2 in both kinds
pub fn sample_replicates() -> Vec<ReplicateRecord> {
    let triangle = vec![(0, 1), (0, 2), (1, 2)];
    let path = vec![(0, 1), (1, 2), (2, 3)];

    vec![
        ReplicateRecord {
            run_id: generate_run_id(1),
            seed: 11,
            r: 0.5,
            pol: 0.5,
            static_run: run_from_curve(11, &[2, 4, 2, 0], 6, false, triangle.clone()),
            dynamic_run: run_from_curve(11, &[2, 3, 1, 0], 4, true, path.clone()),
        },
        ReplicateRecord {
            run_id: generate_run_id(2),
            seed: 12,
            r: 0.5,
            pol: 0.5,
            static_run: run_from_curve(12, &[2, 2, 0], 4, false, triangle),
            dynamic_run: run_from_curve(12, &[2, 1, 0], 2, true, path),
        },
    ]
}
