//! Seed Sets
//!
//! Initial infected and no-vax node sets.

use rand::seq::index;

use super::SetupError;
use crate::components::Graph;
use crate::SimRng;
use epi_events::Edge;

/// `k` distinct node ids from `0..n`, sorted.
pub fn sample_nodes(n: usize, k: usize, rng: &mut SimRng) -> Result<Vec<usize>, SetupError> {
    if k > n {
        return Err(SetupError::SampleTooLarge {
            requested: k,
            population: n,
        });
    }
    let mut nodes = index::sample(&mut rng.0, n, k).into_vec();
    nodes.sort_unstable();
    Ok(nodes)
}

/// `k` distinct entries of `pool`, sorted.
pub fn sample_from(pool: &[usize], k: usize, rng: &mut SimRng) -> Result<Vec<usize>, SetupError> {
    let picks = sample_nodes(pool.len(), k, rng)?;
    let mut nodes: Vec<usize> = picks.into_iter().map(|i| pool[i]).collect();
    nodes.sort_unstable();
    Ok(nodes)
}

/// Grows an aware (no-vax) set from `seeds` by synchronous SI spreading.
///
/// Each round, every unaware node gets one trial with probability `p_spread`
/// per aware neighbor. Growth stops at `target` nodes, or once no unaware
/// node touches an aware one. Returns the aware set, sorted.
pub fn spread_awareness(
    n: usize,
    edges: &[Edge],
    target: usize,
    seeds: &[usize],
    p_spread: f64,
    rng: &mut SimRng,
) -> Vec<usize> {
    let mut graph = Graph::with_nodes(n);
    for &(u, v) in edges {
        if u < n && v < n {
            graph.add_edge(u, v);
        }
    }

    let mut aware = vec![false; n];
    for &seed in seeds.iter().filter(|&&s| s < n) {
        aware[seed] = true;
    }
    let mut count = aware.iter().filter(|&&a| a).count();

    while count < target && p_spread > 0.0 {
        let frontier = (0..n).any(|node| {
            !aware[node] && graph.neighbors(node).iter().any(|&nb| aware[nb])
        });
        if !frontier {
            break;
        }

        let mut next = aware.clone();
        for node in 0..n {
            if aware[node] {
                continue;
            }
            for &neighbor in graph.neighbors(node) {
                if aware[neighbor] && rng.chance(p_spread) && !next[node] && count < target {
                    next[node] = true;
                    count += 1;
                }
            }
        }
        aware = next;
    }

    (0..n).filter(|&node| aware[node]).collect()
}
