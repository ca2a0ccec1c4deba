pub use crate::Error;

// Re-export key components
pub use crate::loading::osm::{
    MemorySource, OneShotSource, PbfSource, RecordSource, build_graph, haversine_km, ingest,
};
pub use crate::loading::{RoadNetworkConfig, TraceLimits, create_road_network};
pub use crate::model::{NetworkBounds, NetworkSummary, NodeDetails, RoadNetwork};
pub use crate::routing::dijkstra::{
    ExploredNode, FrontierEdge, FrontierSnapshot, MinHeap, Relaxation, SearchTrace,
};
pub use crate::routing::{SearchResult, find_path, find_path_with_limits};

// Core types for the road network
pub use crate::model::{Edge, NodeId, NodeRecord, OsmRecord, RoadGraph, WayId, WayRecord};
