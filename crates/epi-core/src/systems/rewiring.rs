//! Rewiring System
//!
//! Homophily rewiring of the information network, applied once per tick
//! before any node rule runs and driven by the committed opinions.
//!
//! Each disagreement edge (pro-vax on one end, no-vax on the other) present
//! at the start of the pass is rewired with probability `pol`. A rewired
//! endpoint is reconnected to a node drawn uniformly from its own opinion
//! class, excluding itself and its current neighbors. Neutral nodes never
//! take part.

use bevy_ecs::prelude::*;
use tracing::debug;

use super::{RunSettings, SimClock};
use crate::components::{Graph, NetworkStore, OpinionState};
use crate::config::RewirePolicy;
use crate::SimRng;

/// Resource: disagreement edges replaced since the run started
#[derive(Resource, Debug, Default)]
pub struct RewireCount(pub u64);

/// Outcome of one rewiring pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewireReport {
    /// Disagreement edges seen at the start of the pass
    pub disagreement_edges: usize,
    /// Edges removed and reconnected
    pub rewired: usize,
    /// Edges selected by `pol` but left alone for lack of a same-opinion partner
    pub skipped: usize,
}

/// Runs one rewiring pass over `information` using the snapshot `opinions`.
pub fn rewire(
    information: &mut Graph,
    opinions: &[OpinionState],
    pol: f64,
    policy: RewirePolicy,
    rng: &mut SimRng,
) -> RewireReport {
    let mut report = RewireReport::default();

    let class_of = |opinion: OpinionState| -> Vec<usize> {
        opinions
            .iter()
            .enumerate()
            .filter(|&(_, &o)| o == opinion)
            .map(|(node, _)| node)
            .collect()
    };
    let pro_vax = class_of(OpinionState::ProVax);
    let no_vax = class_of(OpinionState::NoVax);
    if pro_vax.is_empty() || no_vax.is_empty() {
        return report;
    }
    let class = |node: usize| {
        if opinions[node] == OpinionState::ProVax {
            pro_vax.as_slice()
        } else {
            no_vax.as_slice()
        }
    };

    for (u, v) in information.edges() {
        if !opinions[u].disagrees_with(opinions[v]) {
            continue;
        }
        report.disagreement_edges += 1;
        if !rng.chance(pol) {
            continue;
        }

        match policy {
            RewirePolicy::Densify => {
                let u_partners = partner_candidates(information, u, class(u));
                let v_partners = partner_candidates(information, v, class(v));
                let (Some(&u_partner), Some(&v_partner)) =
                    (rng.choose(&u_partners), rng.choose(&v_partners))
                else {
                    report.skipped += 1;
                    continue;
                };
                information.remove_edge(u, v);
                information.add_edge(u, u_partner);
                information.add_edge(v, v_partner);
            }
            RewirePolicy::DegreePreserving => {
                let mover = if rng.chance(0.5) { u } else { v };
                let partners = partner_candidates(information, mover, class(mover));
                let Some(&partner) = rng.choose(&partners) else {
                    report.skipped += 1;
                    continue;
                };
                information.remove_edge(u, v);
                information.add_edge(mover, partner);
            }
        }
        report.rewired += 1;
    }
    report
}

/// Same-opinion nodes `node` could connect to without duplicating an edge.
fn partner_candidates(information: &Graph, node: usize, class: &[usize]) -> Vec<usize> {
    class
        .iter()
        .copied()
        .filter(|&other| other != node && !information.has_edge(node, other))
        .collect()
}

/// System: rewire the information network when rewiring is enabled
pub fn rewire_information_network(
    settings: Res<RunSettings>,
    clock: Res<SimClock>,
    mut store: ResMut<NetworkStore>,
    mut rng: ResMut<SimRng>,
    mut count: ResMut<RewireCount>,
) {
    if !settings.model.rewiring {
        return;
    }
    let rng = &mut *rng;
    let (information, current) = store.rewire_view();
    let report = rewire(
        information,
        current.opinions(),
        settings.params.pol,
        settings.model.rewire_policy,
        rng,
    );
    count.0 += report.rewired as u64;
    debug!(
        tick = clock.tick,
        disagreement_edges = report.disagreement_edges,
        rewired = report.rewired,
        skipped = report.skipped,
        "rewired information network"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use OpinionState::*;

    /// Two pro-vax nodes (0, 1) and two no-vax nodes (2, 3) joined by one
    /// disagreement edge 1 - 2.
    fn bridged_pairs() -> (Graph, Vec<OpinionState>) {
        let graph = Graph::from_edges(6, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        // 4 is pro-vax and 5 is no-vax, both isolated, so each endpoint has
        // exactly one legal partner.
        let opinions = vec![ProVax, ProVax, NoVax, NoVax, ProVax, NoVax];
        (graph, opinions)
    }

    #[test]
    fn test_densify_adds_exactly_one_edge() {
        let (mut graph, opinions) = bridged_pairs();
        let before = graph.edge_count();
        let mut rng = SimRng::seeded(1);

        let report = rewire(&mut graph, &opinions, 1.0, RewirePolicy::Densify, &mut rng);

        assert_eq!(report.rewired, 1);
        assert_eq!(graph.edge_count(), before + 1);
        assert!(!graph.has_edge(1, 2));
        assert!(graph.has_edge(1, 4));
        assert!(graph.has_edge(2, 5));
        for (u, v) in graph.edges() {
            assert!(!opinions[u].disagrees_with(opinions[v]));
        }
    }

    #[test]
    fn test_degree_preserving_keeps_edge_count() {
        let (mut graph, opinions) = bridged_pairs();
        let before = graph.edge_count();
        let mut rng = SimRng::seeded(1);

        let report = rewire(&mut graph, &opinions, 1.0, RewirePolicy::DegreePreserving, &mut rng);

        assert_eq!(report.rewired, 1);
        assert_eq!(graph.edge_count(), before);
        assert!(!graph.has_edge(1, 2));
        assert!(graph.has_edge(1, 4) ^ graph.has_edge(2, 5));
    }

    #[test]
    fn test_zero_pol_changes_nothing() {
        let (mut graph, opinions) = bridged_pairs();
        let original = graph.clone();
        let mut rng = SimRng::seeded(1);

        let report = rewire(&mut graph, &opinions, 0.0, RewirePolicy::Densify, &mut rng);

        assert_eq!(report.disagreement_edges, 1);
        assert_eq!(report.rewired, 0);
        assert_eq!(graph, original);
    }

    #[test]
    fn test_empty_class_skips_rewiring() {
        let mut graph = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let opinions = vec![ProVax, ProVax, ProVax];
        let original = graph.clone();
        let mut rng = SimRng::seeded(1);

        let report = rewire(&mut graph, &opinions, 1.0, RewirePolicy::Densify, &mut rng);

        assert_eq!(report, RewireReport::default());
        assert_eq!(graph, original);
    }

    #[test]
    fn test_no_partner_leaves_edge_in_place() {
        // The lone no-vax node has nobody to reconnect to.
        let mut graph = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let opinions = vec![ProVax, ProVax, NoVax];
        let mut rng = SimRng::seeded(1);

        let report = rewire(&mut graph, &opinions, 1.0, RewirePolicy::Densify, &mut rng);

        assert_eq!(report.skipped, 1);
        assert!(graph.has_edge(1, 2));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_neutral_nodes_do_not_rewire() {
        let mut graph = Graph::from_edges(4, &[(0, 1), (2, 3)]).unwrap();
        let opinions = vec![Neutral, ProVax, Neutral, NoVax];
        let original = graph.clone();
        let mut rng = SimRng::seeded(1);

        let report = rewire(&mut graph, &opinions, 1.0, RewirePolicy::Densify, &mut rng);

        assert_eq!(report.disagreement_edges, 0);
        assert_eq!(graph, original);
    }
}
