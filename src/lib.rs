use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::define_stub_info_gatherer;

use model::{PyRoadNetwork, py_load_road_network, py_load_road_network_from_config};
use routing::{find_route, find_route_geojson};

pub mod model;
pub mod routing;

/// A Python module implemented in Rust.
#[pymodule]
fn roadroute(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyRoadNetwork>()?;
    m.add_function(wrap_pyfunction!(py_load_road_network, m)?)?;
    m.add_function(wrap_pyfunction!(py_load_road_network_from_config, m)?)?;

    m.add_function(wrap_pyfunction!(find_route, m)?)?;
    m.add_function(wrap_pyfunction!(find_route_geojson, m)?)?;
    Ok(())
}

#[cfg(feature = "stubgen")]
define_stub_info_gatherer!(stub_info);
