use pyo3::prelude::*;
use pyo3::types::PyDict;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::gen_stub_pyfunction;

use crate::model::{PyRoadNetwork, node_to_py, to_py_err};
use roadroute_core::prelude::*;

/// Convert the animation part of a search trace into Python lists
fn trace_to_py<'py>(
    py: Python<'py>,
    network: &RoadNetwork,
    trace: &SearchTrace,
    dict: &Bound<'py, PyDict>,
) -> PyResult<()> {
    let explored = trace
        .explored
        .iter()
        .filter_map(|e| network.node_record(e.node).map(|node| (e, node)))
        .take(network.trace_limits().max_explored_features)
        .map(|(explored, node)| {
            let item = node_to_py(py, node)?;
            item.set_item("distance", explored.distance)?;
            item.set_item("iteration", explored.iteration)?;
            Ok(item)
        })
        .collect::<PyResult<Vec<_>>>()?;

    let relaxations = trace
        .relaxations
        .iter()
        .map(|relaxation| {
            let item = PyDict::new(py);
            item.set_item("from", relaxation.from.0)?;
            item.set_item("to", relaxation.to.0)?;
            item.set_item("distance", relaxation.distance)?;
            item.set_item("iteration", relaxation.iteration)?;
            Ok(item)
        })
        .collect::<PyResult<Vec<_>>>()?;

    let frontier = trace
        .frontier
        .iter()
        .map(|snapshot| {
            let edges: Vec<(i64, i64, f64)> = snapshot
                .edges
                .iter()
                .map(|edge| (edge.from.0, edge.to.0, edge.distance))
                .collect();
            let item = PyDict::new(py);
            item.set_item("iteration", snapshot.iteration)?;
            item.set_item("center", snapshot.center.0)?;
            item.set_item("edges", edges)?;
            Ok(item)
        })
        .collect::<PyResult<Vec<_>>>()?;

    dict.set_item("explored", explored)?;
    dict.set_item("relaxations", relaxations)?;
    dict.set_item("frontier", frontier)?;
    Ok(())
}

/// Find the shortest path between two node ids
///
/// Parameters
/// ----------
/// network : RoadNetwork
/// start : int
///     OSM id of the start node
/// end : int
///     OSM id of the destination node
/// animate : bool, default=False
///     Also return the explored nodes, relaxations and sampled frontier
///     edges of the search
///
/// Returns
/// -------
/// dict or None
///     None when the nodes are unknown or not connected
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (network, start, end, animate = false))]
pub fn find_route<'py>(
    py: Python<'py>,
    network: &PyRoadNetwork,
    start: i64,
    end: i64,
    animate: bool,
) -> PyResult<Option<Bound<'py, PyDict>>> {
    let network = &network.network;
    let result = network.find_route(NodeId(start), NodeId(end), animate);

    let Some(path) = &result.path else {
        return Ok(None);
    };

    let path_coords = network
        .path_coords(path)
        .iter()
        .map(|node| node_to_py(py, node))
        .collect::<PyResult<Vec<_>>>()?;

    let dict = PyDict::new(py);
    dict.set_item("path", path.iter().map(|id| id.0).collect::<Vec<_>>())?;
    dict.set_item("path_coords", path_coords)?;
    dict.set_item("distance_km", result.distance)?;
    dict.set_item("node_count", result.node_count())?;
    dict.set_item("iterations", result.iterations)?;

    if let Some(trace) = &result.trace {
        trace_to_py(py, network, trace, &dict)?;
    }

    Ok(Some(dict))
}

/// Find the shortest path and return it as a GeoJSON FeatureCollection string
///
/// Returns None when no path exists.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (network, start, end, animate = false))]
pub fn find_route_geojson(
    network: &PyRoadNetwork,
    start: i64,
    end: i64,
    animate: bool,
) -> PyResult<Option<String>> {
    let network = &network.network;
    let result = network.find_route(NodeId(start), NodeId(end), animate);
    if !result.is_found() {
        return Ok(None);
    }

    result.to_geojson_string(network).map(Some).map_err(to_py_err)
}
