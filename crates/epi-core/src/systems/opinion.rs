//! Opinion Transition System
//!
//! Opinion dynamics on the information network, evaluated per node against
//! the committed snapshot:
//!
//! - media: with probability `pro` the node is pushed to pro-vax (two-state)
//!   or, if neutral, converted to pro-vax (three-state)
//! - otherwise social contagion: a voter-model copy of one random neighbor
//!   (two-state), or adoption weighted by neighbor opinion fractions drawn
//!   against one cumulative threshold (three-state)
//! - symptomatic conversion: infectious nodes turn pro-vax with `p_sym`,
//!   overriding the outcome above
//!
//! With the vaccination guard on, vaccinated nodes skip social contagion.

use bevy_ecs::prelude::*;

use super::RunSettings;
use crate::components::{EpidemicState, Graph, NetworkStore, NodeStates, OpinionState, TickView};
use crate::config::{ModelOptions, ModelParams, NeighborWeighting, OpinionModel};
use crate::SimRng;

/// Next opinion of `node`, or `None` if it keeps its current one.
pub fn opinion_transition(
    node: usize,
    information: &Graph,
    current: &NodeStates,
    params: &ModelParams,
    model: &ModelOptions,
    rng: &mut SimRng,
) -> Option<OpinionState> {
    let mut outcome = if rng.chance(params.pro) {
        media_push(model.opinion_model, current.opinion(node))
    } else if model.vaccination_guard && current.epidemic(node) == EpidemicState::Vaccinated {
        None
    } else {
        match model.opinion_model {
            OpinionModel::TwoState => voter_copy(node, information, current, rng),
            OpinionModel::ThreeState => {
                weighted_adoption(node, information, current, model.neighbor_weighting, rng)
            }
        }
    };

    if current.epidemic(node) == EpidemicState::Infectious && rng.chance(params.p_sym) {
        outcome = Some(OpinionState::ProVax);
    }
    outcome
}

fn media_push(model: OpinionModel, opinion: OpinionState) -> Option<OpinionState> {
    match (model, opinion) {
        (OpinionModel::TwoState, _) => Some(OpinionState::ProVax),
        (OpinionModel::ThreeState, OpinionState::Neutral) => Some(OpinionState::ProVax),
        (OpinionModel::ThreeState, _) => None,
    }
}

fn voter_copy(
    node: usize,
    information: &Graph,
    current: &NodeStates,
    rng: &mut SimRng,
) -> Option<OpinionState> {
    rng.choose(information.neighbors(node))
        .map(|&neighbor| current.opinion(neighbor))
}

fn weighted_adoption(
    node: usize,
    information: &Graph,
    current: &NodeStates,
    weighting: NeighborWeighting,
    rng: &mut SimRng,
) -> Option<OpinionState> {
    let (mut no_vax, mut pro_vax, mut neutral) = (0usize, 0usize, 0usize);
    for &neighbor in information.neighbors(node) {
        match current.opinion(neighbor) {
            OpinionState::NoVax => no_vax += 1,
            OpinionState::ProVax => pro_vax += 1,
            OpinionState::Neutral => neutral += 1,
        }
    }

    let denominator = match weighting {
        NeighborWeighting::Opinionated => no_vax + pro_vax,
        NeighborWeighting::AllNeighbors => no_vax + pro_vax + neutral,
    };
    if denominator == 0 {
        return None;
    }

    let draw = rng.uniform();
    let p_no_vax = no_vax as f64 / denominator as f64;
    let p_pro_vax = pro_vax as f64 / denominator as f64;
    if draw < p_no_vax {
        Some(OpinionState::NoVax)
    } else if draw < p_no_vax + p_pro_vax {
        Some(OpinionState::ProVax)
    } else {
        None
    }
}

/// System: stage the next opinion of every node
pub fn compute_opinion_transitions(
    settings: Res<RunSettings>,
    mut store: ResMut<NetworkStore>,
    mut rng: ResMut<SimRng>,
) {
    let rng = &mut *rng;
    let TickView {
        information,
        current,
        next,
        ..
    } = store.stage();
    for node in 0..current.len() {
        if let Some(opinion) =
            opinion_transition(node, information, current, &settings.params, &settings.model, rng)
        {
            next.set_opinion(node, opinion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pro: f64, p_sym: f64) -> ModelParams {
        ModelParams {
            beta: 0.0,
            mu: 0.0,
            r: 0.0,
            pro,
            pol: 0.0,
            p_sym,
            gamma: 0.0,
        }
    }

    fn model(opinion_model: OpinionModel) -> ModelOptions {
        ModelOptions {
            opinion_model,
            ..ModelOptions::default()
        }
    }

    fn star(leaves: usize) -> Graph {
        let edges: Vec<_> = (1..=leaves).map(|i| (0, i)).collect();
        Graph::from_edges(leaves + 1, &edges).unwrap()
    }

    #[test]
    fn test_voter_copies_only_neighbor() {
        let graph = Graph::from_edges(2, &[(0, 1)]).unwrap();
        let mut states = NodeStates::new(2, OpinionState::ProVax);
        states.set_opinion(1, OpinionState::NoVax);
        let mut rng = SimRng::seeded(5);

        let next = opinion_transition(0, &graph, &states, &params(0.0, 0.0), &model(OpinionModel::TwoState), &mut rng);
        assert_eq!(next, Some(OpinionState::NoVax));
    }

    #[test]
    fn test_isolated_node_keeps_opinion() {
        let graph = Graph::with_nodes(1);
        let states = NodeStates::new(1, OpinionState::NoVax);
        let mut rng = SimRng::seeded(5);

        for opinion_model in [OpinionModel::TwoState, OpinionModel::ThreeState] {
            let next = opinion_transition(0, &graph, &states, &params(0.0, 0.0), &model(opinion_model), &mut rng);
            assert_eq!(next, None);
        }
    }

    #[test]
    fn test_media_push_two_state() {
        let graph = Graph::with_nodes(1);
        let states = NodeStates::new(1, OpinionState::NoVax);
        let mut rng = SimRng::seeded(5);

        let next = opinion_transition(0, &graph, &states, &params(1.0, 0.0), &model(OpinionModel::TwoState), &mut rng);
        assert_eq!(next, Some(OpinionState::ProVax));
    }

    #[test]
    fn test_media_push_three_state_only_converts_neutral() {
        let graph = Graph::with_nodes(2);
        let mut states = NodeStates::new(2, OpinionState::Neutral);
        states.set_opinion(1, OpinionState::NoVax);
        let mut rng = SimRng::seeded(5);
        let three = model(OpinionModel::ThreeState);

        assert_eq!(
            opinion_transition(0, &graph, &states, &params(1.0, 0.0), &three, &mut rng),
            Some(OpinionState::ProVax)
        );
        assert_eq!(
            opinion_transition(1, &graph, &states, &params(1.0, 0.0), &three, &mut rng),
            None
        );
    }

    #[test]
    fn test_symptomatic_conversion_overrides_contagion() {
        let graph = Graph::from_edges(2, &[(0, 1)]).unwrap();
        let mut states = NodeStates::new(2, OpinionState::NoVax);
        states.set_epidemic(0, EpidemicState::Infectious);
        let mut rng = SimRng::seeded(5);

        let next = opinion_transition(0, &graph, &states, &params(0.0, 1.0), &model(OpinionModel::TwoState), &mut rng);
        assert_eq!(next, Some(OpinionState::ProVax));
    }

    #[test]
    fn test_vaccination_guard_blocks_contagion() {
        let graph = Graph::from_edges(2, &[(0, 1)]).unwrap();
        let mut states = NodeStates::new(2, OpinionState::ProVax);
        states.set_epidemic(0, EpidemicState::Vaccinated);
        states.set_opinion(1, OpinionState::NoVax);
        let mut rng = SimRng::seeded(5);

        let guarded = model(OpinionModel::TwoState);
        assert_eq!(
            opinion_transition(0, &graph, &states, &params(0.0, 0.0), &guarded, &mut rng),
            None
        );

        let unguarded = ModelOptions {
            vaccination_guard: false,
            ..guarded
        };
        assert_eq!(
            opinion_transition(0, &graph, &states, &params(0.0, 0.0), &unguarded, &mut rng),
            Some(OpinionState::NoVax)
        );
    }

    #[test]
    fn test_three_state_unanimous_neighbors() {
        let graph = star(3);
        let mut states = NodeStates::new(4, OpinionState::NoVax);
        states.set_opinion(0, OpinionState::Neutral);
        let mut rng = SimRng::seeded(9);
        let three = model(OpinionModel::ThreeState);

        for _ in 0..50 {
            assert_eq!(
                opinion_transition(0, &graph, &states, &params(0.0, 0.0), &three, &mut rng),
                Some(OpinionState::NoVax)
            );
        }
    }

    #[test]
    fn test_three_state_neutral_neighbors_only() {
        let graph = star(2);
        let states = NodeStates::new(3, OpinionState::Neutral);
        let mut rng = SimRng::seeded(9);

        let opinionated = model(OpinionModel::ThreeState);
        assert_eq!(
            opinion_transition(0, &graph, &states, &params(0.0, 0.0), &opinionated, &mut rng),
            None
        );

        let all = ModelOptions {
            neighbor_weighting: NeighborWeighting::AllNeighbors,
            ..opinionated
        };
        assert_eq!(
            opinion_transition(0, &graph, &states, &params(0.0, 0.0), &all, &mut rng),
            None
        );
    }

    #[test]
    fn test_three_state_fractions_follow_neighbors() {
        // One no-vax and three pro-vax neighbors: roughly a quarter adopt no-vax.
        let graph = star(4);
        let mut states = NodeStates::new(5, OpinionState::ProVax);
        states.set_opinion(0, OpinionState::Neutral);
        states.set_opinion(1, OpinionState::NoVax);
        let mut rng = SimRng::seeded(21);
        let three = model(OpinionModel::ThreeState);

        let trials = 4000;
        let no_vax = (0..trials)
            .filter(|_| {
                opinion_transition(0, &graph, &states, &params(0.0, 0.0), &three, &mut rng)
                    == Some(OpinionState::NoVax)
            })
            .count();
        let share = no_vax as f64 / trials as f64;
        assert!((0.2..0.3).contains(&share), "share = {}", share);
    }
}
