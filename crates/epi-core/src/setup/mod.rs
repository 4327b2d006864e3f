//! Network Setup
//!
//! Network generators, seed-set sampling, and scenario assembly from a config.

pub mod graphs;
pub mod seeding;

pub use graphs::*;
pub use seeding::*;

use thiserror::Error;
use tracing::debug;

use crate::config::{GeneratorKind, NetworkConfig, OpinionModel, SimConfig};
use crate::engine::Scenario;
use crate::SimRng;
use epi_events::Edge;

/// Errors raised by generators and seeding helpers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("Barabási-Albert needs 1 <= m < n, got m = {m}, n = {n}")]
    InvalidAttachment { m: usize, n: usize },
    #[error("edge probability {0} is outside [0, 1]")]
    InvalidEdgeProbability(f64),
    #[error("cannot sample {requested} distinct nodes from {population}")]
    SampleTooLarge { requested: usize, population: usize },
}

/// Generates one network according to `network`.
pub fn generate_network(network: &NetworkConfig, rng: &mut SimRng) -> Result<Vec<Edge>, SetupError> {
    let n = network.nodes;
    match network.generator {
        GeneratorKind::BarabasiAlbert => barabasi_albert(n, (network.ave_degree / 2.0) as usize, rng),
        GeneratorKind::ErdosRenyi => {
            let p = if n > 1 { network.ave_degree / (n - 1) as f64 } else { 0.0 };
            erdos_renyi(n, p, rng)
        }
        GeneratorKind::Ring => Ok(ring(n)),
    }
}

/// Draws the networks and seed sets of one replicate.
///
/// Seed sets are drawn before the networks, so changing the generator
/// leaves the sampled seeds of a given RNG state unchanged.
pub fn build_scenario(config: &SimConfig, rng: &mut SimRng) -> Result<Scenario, SetupError> {
    let n = config.network.nodes;
    let seeding = &config.seeding;

    let initial_infecteds = sample_nodes(n, seeding.n_infecteds, rng)?;
    let physical_edges = generate_network(&config.network, rng)?;
    let information_edges = if config.network.independent_information {
        generate_network(&config.network, rng)?
    } else {
        physical_edges.clone()
    };

    let initial_no_vax = match &seeding.awareness {
        Some(spread) => {
            let seeds = sample_nodes(n, spread.seeds, rng)?;
            spread_awareness(n, &information_edges, seeding.n_no_vax, &seeds, spread.p_spread, rng)
        }
        None => sample_nodes(n, seeding.n_no_vax, rng)?,
    };

    let initial_pro_vax = if config.model.opinion_model == OpinionModel::ThreeState {
        let candidates: Vec<usize> = (0..n).filter(|node| initial_no_vax.binary_search(node).is_err()).collect();
        sample_from(&candidates, seeding.n_pro_vax, rng)?
    } else {
        Vec::new()
    };

    debug!(
        nodes = n,
        physical_edges = physical_edges.len(),
        information_edges = information_edges.len(),
        no_vax = initial_no_vax.len(),
        "scenario built"
    );

    Ok(Scenario {
        population: n,
        physical_edges,
        information_edges,
        initial_infecteds,
        initial_no_vax,
        initial_pro_vax,
    })
}
