//! OSM pbf processing

mod filter;
mod graph;
pub mod source;

pub use filter::ingest;
pub use graph::{EARTH_RADIUS_KM, build_graph, haversine_km};
pub use source::{MemorySource, OneShotSource, PbfSource, RecordKind, RecordSource};
