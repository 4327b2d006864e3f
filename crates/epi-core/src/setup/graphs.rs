//! Network Generators
//!
//! Edge lists for the physical and information networks.

use epi_events::Edge;

use super::SetupError;
use crate::SimRng;

/// Preferential-attachment graph on `n` nodes.
///
/// Starts from `m` isolated nodes; every later node links to `m` distinct
/// earlier nodes picked with probability proportional to their degree.
/// Produces `(n - m) * m` edges.
pub fn barabasi_albert(n: usize, m: usize, rng: &mut SimRng) -> Result<Vec<Edge>, SetupError> {
    if m == 0 || m >= n {
        return Err(SetupError::InvalidAttachment { m, n });
    }

    let mut edges = Vec::with_capacity((n - m) * m);
    // Every node appears once per incident edge, so a uniform pick from this
    // list is a degree-weighted pick.
    let mut repeated: Vec<usize> = Vec::with_capacity(2 * (n - m) * m);
    let mut targets: Vec<usize> = (0..m).collect();

    for source in m..n {
        for &target in &targets {
            edges.push((target.min(source), target.max(source)));
        }
        repeated.extend_from_slice(&targets);
        repeated.extend(std::iter::repeat(source).take(m));

        targets.clear();
        while targets.len() < m {
            if let Some(&candidate) = rng.choose(&repeated) {
                if !targets.contains(&candidate) {
                    targets.push(candidate);
                }
            }
        }
    }
    Ok(edges)
}

/// G(n, p): each unordered pair is an edge independently with probability `p`.
pub fn erdos_renyi(n: usize, p: f64, rng: &mut SimRng) -> Result<Vec<Edge>, SetupError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SetupError::InvalidEdgeProbability(p));
    }
    let mut edges = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.chance(p) {
                edges.push((u, v));
            }
        }
    }
    Ok(edges)
}

/// Cycle `0 - 1 - … - (n-1) - 0`; a path for fewer than three nodes.
pub fn ring(n: usize) -> Vec<Edge> {
    if n < 3 {
        return (1..n).map(|i| (i - 1, i)).collect();
    }
    let mut edges: Vec<Edge> = (1..n).map(|i| (i - 1, i)).collect();
    edges.push((0, n - 1));
    edges
}
