//! Data model for road network routing
//!
//! Contains the OSM records read from an extract, the graph built from them
//! and the network facade tying both together.

pub mod graph;
pub mod records;
pub mod road_network;

pub use graph::{Edge, OsmNodes, OsmWays, RoadGraph};
pub use records::{NodeId, NodeRecord, OsmRecord, WayId, WayRecord};
pub use road_network::{IndexedPoint, NetworkBounds, NetworkSummary, NodeDetails, RoadNetwork};
