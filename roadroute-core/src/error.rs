use thiserror::Error;

use crate::model::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failure reading .pbf file: {0}")]
    PbfError(#[from] osmpbf::Error),
    #[error("record source cannot be scanned again from the beginning")]
    StreamNotReplayable,
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("node '{0}' not in road network")]
    NodeNotFound(NodeId),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
