//! Undirected weighted road graph keyed by OSM node id

use hashbrown::HashMap;

use super::records::{NodeId, NodeRecord, WayRecord};

/// Node table produced by ingestion
pub type OsmNodes = HashMap<NodeId, NodeRecord>;
/// Way list produced by ingestion, in source order
pub type OsmWays = Vec<WayRecord>;

/// Directed half of a road segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    /// Great-circle length in kilometers
    pub weight: f64,
}

/// Adjacency lists for every node that has at least one edge.
///
/// Each way segment is stored twice, once per direction, so the
/// structure is symmetric. Lists keep the order in which segments were
/// encountered in the way list.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    adjacency: HashMap<NodeId, Vec<Edge>>,
    edge_count: usize,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts both directions of the segment `a - b`.
    ///
    /// `weight` must be finite and non-negative. Shortest-path search relies
    /// on it, and a negative segment makes predecessor chains cyclic.
    pub fn add_segment(&mut self, a: NodeId, b: NodeId, weight: f64) {
        debug_assert!(
            weight.is_finite() && weight >= 0.0,
            "segment {a} - {b} has invalid weight {weight}"
        );
        self.adjacency
            .entry(a)
            .or_default()
            .push(Edge { to: b, weight });
        self.adjacency
            .entry(b)
            .or_default()
            .push(Edge { to: a, weight });
        self.edge_count += 2;
    }

    /// Outgoing edges of `node`, empty if the node is not in the graph
    pub fn neighbors(&self, node: NodeId) -> &[Edge] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges (twice the number of segments)
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[Edge])> + '_ {
        self.adjacency
            .iter()
            .map(|(node, edges)| (*node, edges.as_slice()))
    }
}
