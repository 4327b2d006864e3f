//! Single Runs and Replicates
//!
//! Independent replicates, each pairing a static and a rewired run over the
//! same networks and seed sets. Replicates share nothing mutable and run in
//! parallel on the rayon pool; results come back in replicate order.

use epi_events::{generate_run_id, ReplicateRecord, RunRecord};
use rayon::prelude::*;
use tracing::info;

use crate::config::{RunOptions, SimConfig};
use crate::engine::{Scenario, SimError, Simulation};
use crate::setup::build_scenario;
use crate::SimRng;

/// Runs one replicate from `seed`.
///
/// The seed drives network generation and seed-set sampling; a run seed is
/// then drawn from the same stream and shared by the static and dynamic runs.
pub fn run_replicate(config: &SimConfig, index: u64, seed: u64) -> Result<ReplicateRecord, SimError> {
    let (scenario, run) = prepare(config, seed)?;

    let mut static_model = config.model;
    static_model.rewiring = false;
    let mut dynamic_model = config.model;
    dynamic_model.rewiring = true;

    let static_run = Simulation::new(&scenario, config.params, static_model, run)?.run()?;
    let dynamic_run = Simulation::new(&scenario, config.params, dynamic_model, run)?.run()?;

    Ok(ReplicateRecord {
        run_id: generate_run_id(index),
        seed,
        r: config.params.r,
        pol: config.params.pol,
        static_run,
        dynamic_run,
    })
}

/// Builds the scenario from `seed`, then draws the run seed from the same stream.
fn prepare(config: &SimConfig, seed: u64) -> Result<(Scenario, RunOptions), SimError> {
    let mut rng = SimRng::seeded(seed);
    let scenario = build_scenario(config, &mut rng)?;
    let run = RunOptions {
        seed: rng.next_seed(),
        ..config.run
    };
    Ok((scenario, run))
}

/// Runs one simulation with the configured model and `config.run.seed`.
pub fn run_single(config: &SimConfig) -> Result<RunRecord, SimError> {
    let (scenario, run) = prepare(config, config.run.seed)?;
    Simulation::new(&scenario, config.params, config.model, run)?.run()
}

/// Seeds for `count` replicates, drawn from one master stream.
pub fn replicate_seeds(master_seed: u64, count: usize) -> Vec<u64> {
    let mut master = SimRng::seeded(master_seed);
    (0..count).map(|_| master.next_seed()).collect()
}

/// Runs `count` replicates in parallel. Fails on the first failing replicate.
pub fn run_replicates(
    config: &SimConfig,
    count: usize,
    master_seed: u64,
) -> Result<Vec<ReplicateRecord>, SimError> {
    replicate_seeds(master_seed, count)
        .into_par_iter()
        .enumerate()
        .map(|(i, seed)| run_replicate(config, i as u64 + 1, seed))
        .collect()
}

/// Runs the replicate batch for every `(r, pol)` pair of the experiment grid.
///
/// Each grid point gets its own master seed from the experiment's master
/// stream, so adding replicates never shifts other grid points.
pub fn sweep(config: &SimConfig) -> Result<Vec<ReplicateRecord>, SimError> {
    let experiment = &config.experiment;
    let mut master = SimRng::seeded(experiment.master_seed);
    let mut records = Vec::new();

    for &r in &experiment.r_values {
        for &pol in &experiment.pol_values {
            let mut point = config.clone();
            point.params.r = r;
            point.params.pol = pol;

            let batch = run_replicates(&point, experiment.replicates, master.next_seed())?;
            info!(r, pol, replicates = batch.len(), "grid point completed");
            records.extend(batch);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.network.nodes = 80;
        config.network.ave_degree = 4.0;
        config.seeding.n_infecteds = 4;
        config.seeding.n_no_vax = 30;
        config.params.beta = 0.3;
        config.params.mu = 0.3;
        config
    }

    #[test]
    fn test_replicate_pairs_share_initial_state() {
        let record = run_replicate(&small_config(), 1, 17).unwrap();

        assert_eq!(record.run_id, "run_000001");
        assert_eq!(record.static_run.history[0], record.dynamic_run.history[0]);
        assert!(!record.static_run.summary.rewiring);
        assert!(record.dynamic_run.summary.rewiring);
        assert_eq!(record.static_run.summary.rewired_edges, 0);
    }

    #[test]
    fn test_replicates_are_ordered_and_reproducible() {
        let config = small_config();
        let a = run_replicates(&config, 4, 99).unwrap();
        let b = run_replicates(&config, 4, 99).unwrap();

        assert_eq!(a, b);
        let ids: Vec<_> = a.iter().map(|r| r.run_id.as_str()).collect();
        assert_eq!(ids, vec!["run_000001", "run_000002", "run_000003", "run_000004"]);
        assert_eq!(
            a.iter().map(|r| r.seed).collect::<Vec<_>>(),
            replicate_seeds(99, 4)
        );
    }

    #[test]
    fn test_single_run_draws_its_own_seed() {
        let config = small_config();
        let record = run_single(&config).unwrap();

        let mut rng = SimRng::seeded(config.run.seed);
        let scenario = build_scenario(&config, &mut rng).unwrap();
        let run_seed = rng.next_seed();
        assert_ne!(run_seed, config.run.seed);
        assert_eq!(record.summary.seed, run_seed);

        let run = RunOptions {
            seed: run_seed,
            ..config.run
        };
        let expected = Simulation::new(&scenario, config.params, config.model, run)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(record, expected);
        assert_eq!(record, run_single(&config).unwrap());
    }

    #[test]
    fn test_sweep_covers_grid() {
        let mut config = small_config();
        config.experiment.replicates = 2;
        config.experiment.r_values = vec![0.2, 0.8];
        config.experiment.pol_values = vec![0.5];

        let records = sweep(&config).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].r, 0.2);
        assert_eq!(records[3].r, 0.8);
        assert!(records.iter().all(|r| r.pol == 0.5));
    }
}
