//! Coupled epidemic and vaccination-opinion simulation on two networks.
//!
//! A static physical contact network carries the disease; a mutable
//! information network carries pro-vax / no-vax opinions and is rewired
//! by homophily. Both processes advance in lockstep, one synchronous tick
//! at a time, on a single seeded random source.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub mod components;
pub mod config;
pub mod engine;
pub mod output;
pub mod replicate;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{
    ConfigError, ExperimentConfig, GeneratorKind, ModelOptions, ModelParams, NeighborWeighting,
    NetworkConfig, OpinionModel, RewirePolicy, RunOptions, SeedingConfig, SimConfig,
};
pub use engine::{Scenario, SimError, Simulation, StepOutcome};
pub use replicate::{run_replicate, run_replicates, run_single, sweep};
pub use setup::{build_scenario, SetupError};

/// Seeded random number generator resource
///
/// Every run owns exactly one; nothing in the crate touches a global RNG.
#[derive(Resource, Debug)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// One uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    /// Bernoulli trial; always consumes exactly one draw.
    pub fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// Uniform choice from a slice, `None` when it is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }

    /// Draws a fresh seed for a child generator.
    pub fn next_seed(&mut self) -> u64 {
        self.0.gen()
    }
}
