//! Road network built from a single extract: filtered nodes and ways, the
//! routing graph and a spatial index over the nodes.

use geo::{BoundingRect, Coord, LineString, MultiPoint, Rect};
use itertools::Itertools;
use log::info;
use rstar::{AABB, RTree, primitives::GeomWithData};
use serde::Serialize;

use super::{Edge, NodeId, NodeRecord, OsmNodes, OsmWays, RoadGraph, WayId};
use crate::{
    Error, TraceLimits,
    loading::osm::{RecordSource, build_graph, ingest},
    routing::{SearchResult, find_path_with_limits},
};

/// Node position in the R-tree, `[lon, lat]`
pub type IndexedPoint = GeomWithData<[f64; 2], NodeId>;

/// Maximum number of neighbors listed by [`RoadNetwork::node`]
pub const MAX_LISTED_NEIGHBORS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub node_count: usize,
    pub way_count: usize,
    pub edge_count: usize,
    pub loaded: bool,
    /// `None` when no node survived ingestion
    pub bounds: Option<NetworkBounds>,
}

/// Extent of the kept nodes in degrees, used to frame a map view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub center_lat: f64,
    pub center_lon: f64,
}

impl From<Rect<f64>> for NetworkBounds {
    fn from(rect: Rect<f64>) -> Self {
        let center = rect.center();
        Self {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lon: rect.min().x,
            max_lon: rect.max().x,
            center_lat: center.y,
            center_lon: center.x,
        }
    }
}

/// Node with a preview of its adjacency
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetails {
    pub node: NodeRecord,
    pub neighbor_count: usize,
    pub neighbors: Vec<Edge>,
}

/// The data of one ingestion run. Rebuilt wholesale for every new extract.
pub struct RoadNetwork {
    nodes: OsmNodes,
    ways: OsmWays,
    graph: RoadGraph,
    rtree: RTree<IndexedPoint>,
    bounds: Option<NetworkBounds>,
    trace_limits: TraceLimits,
}

impl RoadNetwork {
    pub fn new(nodes: OsmNodes, ways: OsmWays, trace_limits: TraceLimits) -> Self {
        let graph = build_graph(&nodes, &ways);
        let points = nodes
            .values()
            .map(|node| IndexedPoint::new([node.lon(), node.lat()], node.id))
            .collect();
        let rtree = RTree::bulk_load(points);
        let bounds = nodes
            .values()
            .map(|node| node.geometry)
            .collect::<MultiPoint<f64>>()
            .bounding_rect()
            .map(NetworkBounds::from);

        Self {
            nodes,
            ways,
            graph,
            rtree,
            bounds,
            trace_limits,
        }
    }

    /// Ingests a record source and builds the network from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read twice.
    pub fn from_source(source: &dyn RecordSource, trace_limits: TraceLimits) -> Result<Self, Error> {
        let (nodes, ways) = ingest(source)?;
        let network = Self::new(nodes, ways, trace_limits);
        info!("Road network ready: {:?}", network.summary());
        Ok(network)
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &OsmNodes {
        &self.nodes
    }

    pub fn ways(&self) -> &OsmWays {
        &self.ways
    }

    pub fn trace_limits(&self) -> &TraceLimits {
        &self.trace_limits
    }

    pub fn node_record(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            node_count: self.nodes.len(),
            way_count: self.ways.len(),
            edge_count: self.graph.edge_count(),
            loaded: !self.nodes.is_empty(),
            bounds: self.bounds,
        }
    }

    /// Looks up a node and the first few of its outgoing edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the node was not kept by ingestion.
    pub fn node(&self, id: NodeId) -> Result<NodeDetails, Error> {
        let node = *self.nodes.get(&id).ok_or(Error::NodeNotFound(id))?;
        let edges = self.graph.neighbors(id);

        Ok(NodeDetails {
            node,
            neighbor_count: edges.len(),
            neighbors: edges.iter().take(MAX_LISTED_NEIGHBORS).copied().collect(),
        })
    }

    /// The `limit` nodes with the smallest ids
    pub fn list_nodes(&self, limit: usize) -> Vec<NodeRecord> {
        self.nodes
            .keys()
            .copied()
            .k_smallest(limit)
            .filter_map(|id| self.nodes.get(&id).copied())
            .collect()
    }

    /// Nodes inside the bounding box (inclusive), ordered by id
    pub fn nodes_in_bbox(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        limit: usize,
    ) -> Vec<NodeRecord> {
        let bounds = [min_lat, max_lat, min_lon, max_lon];
        if bounds.iter().any(|v| !v.is_finite()) || min_lat > max_lat || min_lon > max_lon {
            return Vec::new();
        }

        let envelope = AABB::from_corners([min_lon, min_lat], [max_lon, max_lat]);
        self.rtree
            .locate_in_envelope(&envelope)
            .map(|point| point.data)
            .k_smallest(limit)
            .filter_map(|id| self.nodes.get(&id).copied())
            .collect()
    }

    /// Geometry of the first `limit` ways. Vertices without coordinates are
    /// skipped and ways left with fewer than two vertices are omitted.
    pub fn way_geometries(&self, limit: usize) -> Vec<(WayId, LineString<f64>)> {
        self.ways
            .iter()
            .take(limit)
            .filter_map(|way| {
                let coords: Vec<Coord<f64>> = way
                    .refs
                    .iter()
                    .filter_map(|id| self.nodes.get(id))
                    .map(|node| node.geometry.into())
                    .collect();
                (coords.len() >= 2).then(|| (way.id, LineString::new(coords)))
            })
            .collect()
    }

    /// Closest node that is part of the routing graph
    pub fn nearest_node(&self, lat: f64, lon: f64) -> Option<NodeId> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        self.rtree
            .nearest_neighbor_iter(&[lon, lat])
            .map(|point| point.data)
            .find(|id| self.graph.contains(*id))
    }

    /// Coordinates of the given node ids, skipping unknown ones
    pub fn path_coords(&self, path: &[NodeId]) -> Vec<NodeRecord> {
        path.iter()
            .filter_map(|id| self.nodes.get(id).copied())
            .collect()
    }

    /// Shortest path between two node ids using this network's trace limits
    pub fn find_route(&self, start: NodeId, end: NodeId, instrumented: bool) -> SearchResult {
        find_path_with_limits(&self.graph, start, end, instrumented, &self.trace_limits)
    }
}

impl std::fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("nodes", &self.nodes.len())
            .field("ways", &self.ways.len())
            .field("edges", &self.graph.edge_count())
            .finish_non_exhaustive()
    }
}
