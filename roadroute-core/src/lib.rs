//! Road network ingestion from OpenStreetMap extracts and shortest-path
//! search with optional instrumentation of the exploration.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use loading::{RoadNetworkConfig, TraceLimits, create_road_network};
pub use model::{
    Edge, NodeId, NodeRecord, OsmNodes, OsmWays, RoadGraph, RoadNetwork, WayId, WayRecord,
};
pub use routing::{SearchResult, find_path};
