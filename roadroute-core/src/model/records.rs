//! Raw OSM records as they come out of a record source, and the filtered
//! node/way records kept after ingestion.

use std::fmt;

use geo::Point;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// OSM node identifier.
///
/// OSM ids are 64-bit and already exceed 2^53 in some extracts, so they are
/// always carried as `i64`, never as floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

/// OSM way identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WayId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId(value)
    }
}

impl From<i64> for WayId {
    fn from(value: i64) -> Self {
        WayId(value)
    }
}

/// A single typed record produced by a record source.
///
/// Coordinates are optional because sources are allowed to hand over
/// incomplete nodes; those are dropped during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum OsmRecord {
    Node {
        id: NodeId,
        lat: Option<f64>,
        lon: Option<f64>,
    },
    Way {
        id: WayId,
        refs: Vec<NodeId>,
    },
}

impl OsmRecord {
    pub fn node(id: i64, lat: f64, lon: f64) -> Self {
        OsmRecord::Node {
            id: NodeId(id),
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    pub fn way(id: i64, refs: impl IntoIterator<Item = i64>) -> Self {
        OsmRecord::Way {
            id: WayId(id),
            refs: refs.into_iter().map(NodeId).collect(),
        }
    }
}

/// Node kept after ingestion: referenced by a retained way and carrying
/// both coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRecord {
    /// OSM ID of the node
    pub id: NodeId,
    /// Node coordinates (x = lon, y = lat)
    pub geometry: Point<f64>,
}

impl NodeRecord {
    pub fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self {
            id,
            geometry: Point::new(lon, lat),
        }
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}

/// Way kept after ingestion. Always has at least two refs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WayRecord {
    pub id: WayId,
    pub refs: Vec<NodeId>,
}

impl WayRecord {
    /// Consecutive ref pairs, one per polyline segment.
    pub fn segments(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.refs.iter().copied().tuple_windows()
    }
}
