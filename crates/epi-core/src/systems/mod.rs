//! ECS Systems
//!
//! One tick runs these in order: rewiring, epidemic transitions, opinion
//! transitions, commit, tally.

use bevy_ecs::prelude::*;

use crate::components::NetworkStore;
use crate::config::{ModelOptions, ModelParams};

pub mod epidemic;
pub mod opinion;
pub mod rewiring;
pub mod tally;

pub use epidemic::{compute_epidemic_transitions, epidemic_transition};
pub use opinion::{compute_opinion_transitions, opinion_transition};
pub use rewiring::{rewire, rewire_information_network, RewireCount, RewireReport};
pub use tally::{attack_rate, count_population, tally_counts, History};

/// Resource: parameters and switches for the current run
#[derive(Resource, Debug, Clone, Copy)]
pub struct RunSettings {
    pub params: ModelParams,
    pub model: ModelOptions,
}

/// Resource: index of the tick being computed
#[derive(Resource, Debug, Default)]
pub struct SimClock {
    pub tick: u64,
}

/// System: swap the staged node states into the committed snapshot
pub fn commit_node_states(mut store: ResMut<NetworkStore>) {
    store.commit();
}
