use serde::Serialize;

use super::dijkstra::SearchTrace;
use crate::model::NodeId;

/// Outcome of a single shortest-path query.
///
/// A missing path is a normal answer (unknown or disconnected endpoints), so
/// it is represented here rather than as an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Node ids from start to end, `None` when no path exists
    pub path: Option<Vec<NodeId>>,
    /// Route length in kilometers, `None` when no path exists
    pub distance: Option<f64>,
    /// Number of heap pops, stale entries included
    pub iterations: usize,
    /// Only present for instrumented searches
    pub trace: Option<SearchTrace>,
}

impl SearchResult {
    pub(crate) fn not_found(iterations: usize, trace: Option<SearchTrace>) -> Self {
        Self {
            path: None,
            distance: None,
            iterations,
            trace,
        }
    }

    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }

    /// Number of nodes on the path, 0 when there is none
    pub fn node_count(&self) -> usize {
        self.path.as_ref().map_or(0, Vec::len)
    }
}
