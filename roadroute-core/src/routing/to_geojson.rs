use geo::{Coord, LineString, Point, line_string};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::{
    SearchResult,
    dijkstra::{ExploredNode, FrontierEdge},
};
use crate::{Error, model::RoadNetwork};

impl SearchResult {
    /// Converts the route and, for instrumented searches, the explored nodes
    /// and frontier edges to a `GeoJSON` `FeatureCollection`.
    ///
    /// Node ids without coordinates in `network` are skipped.
    pub fn to_geojson(&self, network: &RoadNetwork) -> Result<FeatureCollection, Error> {
        let mut features = Vec::new();

        if let Some(path) = &self.path {
            let coords: Vec<Coord<f64>> = network
                .path_coords(path)
                .iter()
                .map(|node| node.geometry.into())
                .collect();
            if coords.len() >= 2 {
                features.push(create_path_feature(
                    LineString::new(coords),
                    self.distance.unwrap_or_default(),
                    path.len(),
                )?);
            }
        }

        if let Some(trace) = &self.trace {
            let limits = network.trace_limits();

            let explored = trace
                .explored
                .iter()
                .filter_map(|e| network.node_record(e.node).map(|node| (e, node.geometry)))
                .take(limits.max_explored_features);
            for (explored, point) in explored {
                features.push(create_explored_feature(point, explored)?);
            }

            let frontier_edges = trace
                .frontier
                .iter()
                .flat_map(|snapshot| {
                    snapshot
                        .edges
                        .iter()
                        .map(move |edge| (snapshot.iteration, edge))
                })
                .filter_map(|(iteration, edge)| {
                    let from = network.node_record(edge.from)?;
                    let to = network.node_record(edge.to)?;
                    Some((iteration, edge, from.geometry, to.geometry))
                })
                .take(limits.max_frontier_features);
            for (iteration, edge, from, to) in frontier_edges {
                let line = line_string![(x: from.x(), y: from.y()), (x: to.x(), y: to.y())];
                features.push(create_frontier_feature(line, edge, iteration)?);
            }
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self, network: &RoadNetwork) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(network)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn create_path_feature(
    line: LineString<f64>,
    distance: f64,
    node_count: usize,
) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&line));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "kind": "path",
            "distance_km": distance,
            "node_count": node_count,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn create_explored_feature(point: Point<f64>, explored: &ExploredNode) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&point));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "kind": "explored",
            "node": explored.node,
            "distance_km": explored.distance,
            "iteration": explored.iteration,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn create_frontier_feature(
    line: LineString<f64>,
    edge: &FrontierEdge,
    iteration: usize,
) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&line));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "kind": "frontier",
            "from": edge.from,
            "to": edge.to,
            "distance_km": edge.distance,
            "iteration": iteration,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
