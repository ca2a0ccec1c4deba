//! Shortest-path search over the road graph

pub mod dijkstra;
mod result;
mod to_geojson;

pub use dijkstra::{SearchTrace, find_path, find_path_with_limits};
pub use result::SearchResult;
