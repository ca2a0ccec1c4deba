//! This module is responsible for reading OSM extracts and building the
//! road graph used for routing.

mod builder;
mod config;
pub mod osm;

pub use builder::create_road_network;
pub use config::{RoadNetworkConfig, TraceLimits};
