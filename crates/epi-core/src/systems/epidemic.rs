//! Epidemic Transition System
//!
//! SIR(V) transitions on the physical network, evaluated per node against
//! the committed snapshot. The first rule that fires wins:
//!
//! 1. susceptible pro-vax nodes vaccinate with probability `r`
//! 2. infectious nodes recover with probability `mu`
//! 3. susceptible nodes are infected by each infectious neighbor with
//!    probability `beta`, neighbors visited in ascending id order
//! 4. with waning immunity, recovered nodes become susceptible with `gamma`

use bevy_ecs::prelude::*;

use super::RunSettings;
use crate::components::{
    ContactNetwork, EpidemicState, NetworkStore, NodeStates, OpinionState, TickView,
};
use crate::config::ModelParams;
use crate::SimRng;

/// Next epidemic state of `node`, or `None` if no rule fires.
pub fn epidemic_transition(
    node: usize,
    physical: &ContactNetwork,
    current: &NodeStates,
    params: &ModelParams,
    waning_immunity: bool,
    rng: &mut SimRng,
) -> Option<EpidemicState> {
    match current.epidemic(node) {
        EpidemicState::Susceptible => {
            if current.opinion(node) == OpinionState::ProVax && rng.chance(params.r) {
                return Some(EpidemicState::Vaccinated);
            }
            for &neighbor in physical.neighbors(node) {
                if current.epidemic(neighbor) == EpidemicState::Infectious && rng.chance(params.beta)
                {
                    return Some(EpidemicState::Infectious);
                }
            }
            None
        }
        EpidemicState::Infectious => rng.chance(params.mu).then_some(EpidemicState::Recovered),
        EpidemicState::Recovered if waning_immunity => {
            rng.chance(params.gamma).then_some(EpidemicState::Susceptible)
        }
        EpidemicState::Recovered | EpidemicState::Vaccinated => None,
    }
}

/// System: stage the next epidemic state of every node
pub fn compute_epidemic_transitions(
    settings: Res<RunSettings>,
    mut store: ResMut<NetworkStore>,
    mut rng: ResMut<SimRng>,
) {
    let rng = &mut *rng;
    let TickView {
        physical,
        current,
        next,
        ..
    } = store.stage();
    for node in 0..current.len() {
        if let Some(state) = epidemic_transition(
            node,
            physical,
            current,
            &settings.params,
            settings.model.waning_immunity,
            rng,
        ) {
            next.set_epidemic(node, state);
        }
    }
}
