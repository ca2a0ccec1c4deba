use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Configuration for building a road network from an OSM extract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadNetworkConfig {
    /// Path to the `.osm.pbf` extract
    pub osm_path: PathBuf,
    /// Bounds of the instrumentation recorded by animated searches
    #[serde(default)]
    pub trace: TraceLimits,
}

impl RoadNetworkConfig {
    pub fn new(osm_path: impl Into<PathBuf>) -> Self {
        Self {
            osm_path: osm_path.into(),
            trace: TraceLimits::default(),
        }
    }

    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid configuration.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidData(format!("failure decoding configuration: {e}")))
    }

    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Limits on what an instrumented search records.
///
/// The exploration is unbounded, the trace is not: frontier edges are
/// sampled by node degree once `dense_recording_threshold` edges have been
/// recorded, and nothing is recorded past `max_recorded_edges`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceLimits {
    /// Hard cap on frontier edges across the whole search
    pub max_recorded_edges: usize,
    /// Every edge is kept until this many have been recorded
    pub dense_recording_threshold: usize,
    /// Sample rate is `max(1, degree / sample_divisor)`
    pub sample_divisor: usize,
    /// Extra iterations explored after the target is settled, before the multiplier
    pub exploration_after_target: usize,
    pub exploration_multiplier: usize,
    /// GeoJSON export caps
    pub max_explored_features: usize,
    pub max_frontier_features: usize,
}

impl Default for TraceLimits {
    fn default() -> Self {
        Self {
            max_recorded_edges: 100_000,
            dense_recording_threshold: 50_000,
            sample_divisor: 10,
            exploration_after_target: 50,
            exploration_multiplier: 2,
            max_explored_features: 10_000,
            max_frontier_features: 30_000,
        }
    }
}

impl TraceLimits {
    /// Number of iterations an instrumented search keeps going after the
    /// target has been settled
    pub fn exploration_overrun(&self) -> usize {
        self.exploration_after_target
            .saturating_mul(self.exploration_multiplier)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.max_recorded_edges == 0 {
            return Err(Error::InvalidData(
                "trace max_recorded_edges must be greater than zero".to_string(),
            ));
        }
        if self.sample_divisor == 0 {
            return Err(Error::InvalidData(
                "trace sample_divisor must be greater than zero".to_string(),
            ));
        }
        if self.dense_recording_threshold > self.max_recorded_edges {
            return Err(Error::InvalidData(format!(
                "trace dense_recording_threshold ({}) exceeds max_recorded_edges ({})",
                self.dense_recording_threshold, self.max_recorded_edges
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_trace_section_uses_defaults() {
        let config = RoadNetworkConfig::from_json_str(r#"{"osm_path": "map.osm.pbf"}"#).unwrap();
        assert_eq!(config.osm_path, PathBuf::from("map.osm.pbf"));
        assert_eq!(config.trace, TraceLimits::default());
        assert_eq!(config.trace.exploration_overrun(), 100);
    }

    #[test]
    fn partial_trace_section_is_merged_with_defaults() {
        let config = RoadNetworkConfig::from_json_str(
            r#"{"osm_path": "map.osm.pbf", "trace": {"max_recorded_edges": 10, "dense_recording_threshold": 5}}"#,
        )
        .unwrap();
        assert_eq!(config.trace.max_recorded_edges, 10);
        assert_eq!(config.trace.sample_divisor, 10);
        assert!(config.trace.validate().is_ok());
    }

    #[test]
    fn inconsistent_limits_are_rejected() {
        let limits = TraceLimits {
            sample_divisor: 0,
            ..TraceLimits::default()
        };
        assert!(matches!(limits.validate(), Err(Error::InvalidData(_))));

        let limits = TraceLimits {
            max_recorded_edges: 1,
            ..TraceLimits::default()
        };
        assert!(matches!(limits.validate(), Err(Error::InvalidData(_))));

        let limits = TraceLimits {
            max_recorded_edges: 0,
            dense_recording_threshold: 0,
            ..TraceLimits::default()
        };
        assert!(matches!(limits.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn malformed_json_is_invalid_data() {
        assert!(matches!(
            RoadNetworkConfig::from_json_str("{"),
            Err(Error::InvalidData(_))
        ));
    }
}
