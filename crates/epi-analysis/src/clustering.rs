//! Local and average clustering coefficients of an undirected graph.

use epi_events::Edge;

fn adjacency(n: usize, edges: &[Edge]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); n];
    for &(u, v) in edges {
        if u == v || u >= n || v >= n {
            continue;
        }
        adjacency[u].push(v);
        adjacency[v].push(u);
    }
    for neighbors in &mut adjacency {
        neighbors.sort_unstable();
        neighbors.dedup();
    }
    adjacency
}

fn coefficient(adjacency: &[Vec<usize>], node: usize) -> f64 {
    let neighbors = &adjacency[node];
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }
    let mut links = 0usize;
    for (i, &a) in neighbors.iter().enumerate() {
        for &b in &neighbors[i + 1..] {
            if adjacency[a].binary_search(&b).is_ok() {
                links += 1;
            }
        }
    }
    2.0 * links as f64 / (k * (k - 1)) as f64
}

/// Clustering coefficient of every node in `0..n`.
///
/// Self-loops, duplicate edges and edges touching ids `>= n` are ignored.
pub fn local_clustering(n: usize, edges: &[Edge]) -> Vec<f64> {
    let adjacency = adjacency(n, edges);
    (0..n).map(|node| coefficient(&adjacency, node)).collect()
}

/// Mean clustering over all `n` nodes; nodes of degree below two count as 0.
pub fn average_clustering(n: usize, edges: &[Edge]) -> f64 {
    if n == 0 {
        return 0.0;
    }
    local_clustering(n, edges).iter().sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_is_fully_clustered() {
        let triangle = [(0, 1), (1, 2), (0, 2)];
        assert_eq!(local_clustering(3, &triangle), vec![1.0, 1.0, 1.0]);
        assert_eq!(average_clustering(3, &triangle), 1.0);
    }

    #[test]
    fn test_isolated_nodes_dilute_average() {
        let triangle = [(0, 1), (1, 2), (0, 2)];
        assert_eq!(average_clustering(6, &triangle), 0.5);
    }

    #[test]
    fn test_star_has_no_clustering() {
        let star = [(0, 1), (0, 2), (0, 3), (0, 4)];
        assert_eq!(average_clustering(5, &star), 0.0);
    }

    #[test]
    fn test_partial_clustering() {
        // Triangle 0-1-2 with a pendant 3 on node 0.
        let edges = [(0, 1), (1, 2), (0, 2), (0, 3)];
        let local = local_clustering(4, &edges);
        assert!((local[0] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(local[1], 1.0);
        assert_eq!(local[2], 1.0);
        assert_eq!(local[3], 0.0);
    }

    #[test]
    fn test_ignores_malformed_edges() {
        let edges = [(0, 1), (1, 0), (1, 1), (1, 2), (0, 2), (2, 9)];
        assert_eq!(average_clustering(3, &edges), 1.0);
        assert_eq!(average_clustering(0, &edges), 0.0);
    }
}
