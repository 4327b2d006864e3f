//! Network Components
//!
//! Undirected simple graphs over dense node ids, stored as sorted index arrays.

use epi_events::Edge;
use thiserror::Error;

/// Errors raised while building a graph from an edge list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge ({u}, {v}) references a node outside 0..{nodes}")]
    EndpointOutOfRange { u: usize, v: usize, nodes: usize },
    #[error("self-loop on node {node}")]
    SelfLoop { node: usize },
}

/// Undirected simple graph with sorted adjacency lists
///
/// Neighbor iteration order is ascending node id, which gives every rule
/// that walks neighbors a canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    /// Creates an edgeless graph on `nodes` nodes.
    pub fn with_nodes(nodes: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); nodes],
            edge_count: 0,
        }
    }

    /// Builds a graph from an edge list. Duplicate edges collapse into one.
    pub fn from_edges(nodes: usize, edges: &[Edge]) -> Result<Self, GraphError> {
        let mut graph = Self::with_nodes(nodes);
        for &(u, v) in edges {
            if u >= nodes || v >= nodes {
                return Err(GraphError::EndpointOutOfRange { u, v, nodes });
            }
            if u == v {
                return Err(GraphError::SelfLoop { node: u });
            }
            graph.add_edge(u, v);
        }
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Neighbors of `node` in ascending order.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency[u].binary_search(&v).is_ok()
    }

    /// Adds `u - v`. Returns false for self-loops and existing edges.
    pub fn add_edge(&mut self, u: usize, v: usize) -> bool {
        if u == v {
            return false;
        }
        match self.adjacency[u].binary_search(&v) {
            Ok(_) => false,
            Err(pos) => {
                self.adjacency[u].insert(pos, v);
                if let Err(pos) = self.adjacency[v].binary_search(&u) {
                    self.adjacency[v].insert(pos, u);
                }
                self.edge_count += 1;
                true
            }
        }
    }

    /// Removes `u - v`. Returns false if the edge was absent.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        match self.adjacency[u].binary_search(&v) {
            Ok(pos) => {
                self.adjacency[u].remove(pos);
                if let Ok(pos) = self.adjacency[v].binary_search(&u) {
                    self.adjacency[v].remove(pos);
                }
                self.edge_count -= 1;
                true
            }
            Err(_) => false,
        }
    }

    /// All edges as `(smaller, larger)` pairs in lexicographic order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            edges.extend(neighbors.iter().filter(|&&v| v > u).map(|&v| (u, v)));
        }
        edges
    }
}

/// The physical contact network. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNetwork(Graph);

impl ContactNetwork {
    pub fn new(graph: Graph) -> Self {
        Self(graph)
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.0.neighbors(node)
    }

    pub fn node_count(&self) -> usize {
        self.0.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.0.edge_count()
    }
}
