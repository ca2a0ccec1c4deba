use geo::LineString;
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};

use roadroute_core::prelude::*;

/// Maps core errors onto the closest Python exception
pub(crate) fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::NodeNotFound(_) => PyKeyError::new_err(err.to_string()),
        Error::InvalidData(_) => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

pub(crate) fn node_to_py<'py>(py: Python<'py>, node: &NodeRecord) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("id", node.id.0)?;
    dict.set_item("lat", node.lat())?;
    dict.set_item("lon", node.lon())?;
    Ok(dict)
}

fn bounds_to_py<'py>(py: Python<'py>, bounds: &NetworkBounds) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("min_lat", bounds.min_lat)?;
    dict.set_item("max_lat", bounds.max_lat)?;
    dict.set_item("min_lon", bounds.min_lon)?;
    dict.set_item("max_lon", bounds.max_lon)?;
    dict.set_item("center_lat", bounds.center_lat)?;
    dict.set_item("center_lon", bounds.center_lon)?;
    Ok(dict)
}

fn way_to_py<'py>(py: Python<'py>, id: WayId, line: &LineString<f64>) -> PyResult<Bound<'py, PyDict>> {
    let coords: Vec<(f64, f64)> = line.coords().map(|c| (c.y, c.x)).collect();
    let dict = PyDict::new(py);
    dict.set_item("id", id.0)?;
    dict.set_item("coords", coords)?;
    Ok(dict)
}

/// RoadNetwork
///
/// Road graph built from an OpenStreetMap extract, ready for shortest-path
/// queries.
///
/// Only ways with at least two nodes are kept, and only the nodes those ways
/// reference. Edges are weighted by great-circle distance in kilometers.
///
/// Example:
///
/// .. code-block:: python
///
///     network = load_road_network("path/to/osm.pbf")
///     start = network.nearest_node(52.52, 13.40)
///     end = network.nearest_node(52.50, 13.45)
///     route = find_route(network, start, end, animate=True)
#[cfg_attr(feature = "stubgen", gen_stub_pyclass)]
#[pyclass(name = "RoadNetwork")]
pub struct PyRoadNetwork {
    pub(crate) network: RoadNetwork,
}

#[cfg_attr(feature = "stubgen", gen_stub_pymethods)]
#[pymethods]
impl PyRoadNetwork {
    /// Node, way and edge counts of the network, and the extent of its
    /// nodes (``None`` for an empty network)
    pub fn summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let summary = self.network.summary();
        let dict = PyDict::new(py);
        dict.set_item("node_count", summary.node_count)?;
        dict.set_item("way_count", summary.way_count)?;
        dict.set_item("edge_count", summary.edge_count)?;
        dict.set_item("loaded", summary.loaded)?;
        let bounds = summary
            .bounds
            .as_ref()
            .map(|bounds| bounds_to_py(py, bounds))
            .transpose()?;
        dict.set_item("bounds", bounds)?;
        Ok(dict)
    }

    /// Node coordinates and the first neighbors of a node
    ///
    /// Raises
    /// ------
    /// KeyError
    ///     If the node is not part of the network
    pub fn node<'py>(&self, py: Python<'py>, node_id: i64) -> PyResult<Bound<'py, PyDict>> {
        let details = self.network.node(NodeId(node_id)).map_err(to_py_err)?;

        let neighbors = details
            .neighbors
            .iter()
            .map(|edge| {
                let dict = PyDict::new(py);
                dict.set_item("node_id", edge.to.0)?;
                dict.set_item("distance", edge.weight)?;
                Ok(dict)
            })
            .collect::<PyResult<Vec<_>>>()?;

        let dict = node_to_py(py, &details.node)?;
        dict.set_item("neighbor_count", details.neighbor_count)?;
        dict.set_item("neighbors", neighbors)?;
        Ok(dict)
    }

    #[pyo3(signature = (limit = 500))]
    pub fn nodes<'py>(&self, py: Python<'py>, limit: usize) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.network
            .list_nodes(limit)
            .iter()
            .map(|node| node_to_py(py, node))
            .collect()
    }

    /// Nodes inside a latitude/longitude bounding box
    #[pyo3(signature = (min_lat, max_lat, min_lon, max_lon, limit = 100))]
    pub fn nodes_in_bbox<'py>(
        &self,
        py: Python<'py>,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        limit: usize,
    ) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.network
            .nodes_in_bbox(min_lat, max_lat, min_lon, max_lon, limit)
            .iter()
            .map(|node| node_to_py(py, node))
            .collect()
    }

    /// Way geometries as lists of ``(lat, lon)`` pairs
    #[pyo3(signature = (limit = 1000))]
    pub fn ways<'py>(&self, py: Python<'py>, limit: usize) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.network
            .way_geometries(limit)
            .iter()
            .map(|(id, line)| way_to_py(py, *id, line))
            .collect()
    }

    /// Id of the routable node closest to the coordinate, or None
    pub fn nearest_node(&self, lat: f64, lon: f64) -> Option<i64> {
        self.network.nearest_node(lat, lon).map(|id| id.0)
    }

    fn __repr__(&self) -> String {
        let summary = self.network.summary();
        format!(
            "RoadNetwork with {} nodes, {} ways and {} edges",
            summary.node_count, summary.way_count, summary.edge_count
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

/// Create a road network from an OpenStreetMap extract
///
/// The extract is read twice: the first pass keeps ways with at least two
/// nodes, the second keeps coordinates of the nodes those ways reference.
///
/// Parameters
/// ----------
/// osm_path : str
///     Path to OpenStreetMap PBF file containing street network data
/// max_recorded_edges : int, default=100000
///     Cap on frontier edges recorded by animated searches
/// dense_recording_threshold : int, default=50000
///     Number of frontier edges recorded before sampling kicks in
/// exploration_after_target : int, default=50
///     Controls how long animated searches keep exploring after reaching
///     the destination
///
/// Returns
/// -------
/// RoadNetwork
///
/// Raises
/// ------
/// ValueError
///     If the file does not exist or the limits are inconsistent
/// RuntimeError
///     If the extract cannot be decoded
///
/// Notes
/// -----
/// The function releases the GIL during processing to allow other Python threads to continue execution.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "load_road_network")]
#[pyo3(signature = (
    osm_path,
    max_recorded_edges = 100_000,
    dense_recording_threshold = 50_000,
    exploration_after_target = 50
))]
pub fn py_load_road_network(
    py: Python<'_>,
    osm_path: &str,
    max_recorded_edges: usize,
    dense_recording_threshold: usize,
    exploration_after_target: usize,
) -> PyResult<PyRoadNetwork> {
    let config = RoadNetworkConfig {
        osm_path: std::path::PathBuf::from(osm_path),
        trace: TraceLimits {
            max_recorded_edges,
            dense_recording_threshold,
            exploration_after_target,
            ..TraceLimits::default()
        },
    };

    let network = py
        .detach(|| create_road_network(&config))
        .map_err(to_py_err)?;
    Ok(PyRoadNetwork { network })
}

/// Create a road network from a JSON configuration file
///
/// The file holds ``osm_path`` and an optional ``trace`` object with the
/// instrumentation limits.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "load_road_network_from_config")]
pub fn py_load_road_network_from_config(
    py: Python<'_>,
    config_path: &str,
) -> PyResult<PyRoadNetwork> {
    let config = RoadNetworkConfig::from_json_file(config_path).map_err(to_py_err)?;

    let network = py
        .detach(|| create_road_network(&config))
        .map_err(to_py_err)?;
    Ok(PyRoadNetwork { network })
}
