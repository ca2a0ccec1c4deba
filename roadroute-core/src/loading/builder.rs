use log::info;

use super::config::RoadNetworkConfig;
use super::osm::PbfSource;
use crate::{Error, model::RoadNetwork};

/// Creates a road network from the extract named in the configuration
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the extract cannot be
/// read in both passes
pub fn create_road_network(config: &RoadNetworkConfig) -> Result<RoadNetwork, Error> {
    validate_config(config)?;

    info!(
        "Processing street data (OSM): {}",
        config.osm_path.display()
    );

    let source = PbfSource::new(&config.osm_path);
    let network = RoadNetwork::from_source(&source, config.trace)?;

    info!("Road network created successfully");
    // Pass 2 frees the referenced-id set, and osmpbf decoding allocates a lot
    // of short-lived blocks. This memory is not always released back to the
    // system. This call will release all free memory from the tail of the
    // heap back to the system.
    //
    // # Safety
    //
    // This call is safe to use on linux with glibc implementation
    // which is checked by the cfg attribute in compile time.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            log::warn!("Memory trimming failed - continuing anyway");
        } else {
            log::debug!("Successfully trimmed unused heap memory");
        }
    }
    Ok(network)
}

fn validate_config(config: &RoadNetworkConfig) -> Result<(), Error> {
    if !config.osm_path.exists() {
        return Err(Error::InvalidData(format!(
            "OSM file not found: {}",
            config.osm_path.display()
        )));
    }

    config.trace.validate()
}
