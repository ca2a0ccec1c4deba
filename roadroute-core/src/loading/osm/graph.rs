use log::info;

use crate::model::{NodeRecord, OsmNodes, OsmWays, RoadGraph};

/// Earth radius used for edge weights, in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two nodes in kilometers (haversine formula)
pub fn haversine_km(from: &NodeRecord, to: &NodeRecord) -> f64 {
    let d_lat = (to.lat() - from.lat()).to_radians();
    let d_lon = (to.lon() - from.lon()).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat().to_radians().cos() * to.lat().to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Builds the undirected road graph from filtered nodes and ways.
///
/// Every consecutive pair of refs becomes one edge in each direction, weighted
/// by its haversine length. Segments touching a node without coordinates are
/// dropped.
pub fn build_graph(nodes: &OsmNodes, ways: &OsmWays) -> RoadGraph {
    let mut graph = RoadGraph::new();
    let mut dropped = 0usize;

    for way in ways {
        for (a, b) in way.segments() {
            match (nodes.get(&a), nodes.get(&b)) {
                (Some(from), Some(to)) => graph.add_segment(a, b, haversine_km(from, to)),
                _ => dropped += 1,
            }
        }
    }

    info!(
        "Graph ready: {} edges, {} connected nodes ({dropped} segments without coordinates dropped)",
        graph.edge_count(),
        graph.node_count()
    );
    graph
}

#[cfg(test)]
mod tests {
    use hashbrown::HashMap;

    use super::*;
    use crate::model::{NodeId, WayId, WayRecord};

    fn node(id: i64, lat: f64, lon: f64) -> (NodeId, NodeRecord) {
        (NodeId(id), NodeRecord::new(NodeId(id), lat, lon))
    }

    fn way(id: i64, refs: &[i64]) -> WayRecord {
        WayRecord {
            id: WayId(id),
            refs: refs.iter().copied().map(NodeId).collect(),
        }
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let (_, a) = node(1, 0.0, 0.0);
        let (_, b) = node(2, 0.0, 1.0);
        let d = haversine_km(&a, &b);
        assert!((d - 111.19).abs() < 0.01, "got {d}");
        assert_eq!(haversine_km(&a, &a), 0.0);
    }

    #[test]
    fn linear_way_yields_symmetric_edges() {
        let nodes: OsmNodes = HashMap::from([node(1, 0.0, 0.0), node(2, 0.0, 1.0), node(3, 0.0, 2.0)]);
        let graph = build_graph(&nodes, &vec![way(1, &[1, 2, 3])]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.neighbors(NodeId(2)).len(), 2);

        for (from, edges) in graph.iter() {
            for edge in edges {
                assert!(edge.weight >= 0.0);
                let back = graph
                    .neighbors(edge.to)
                    .iter()
                    .find(|e| e.to == from)
                    .expect("reverse edge");
                assert!((back.weight - edge.weight).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn segments_with_missing_nodes_are_dropped() {
        let nodes: OsmNodes = HashMap::from([node(1, 0.0, 0.0), node(2, 0.0, 1.0)]);
        let graph = build_graph(&nodes, &vec![way(1, &[1, 2, 3, 4])]);

        assert_eq!(graph.edge_count(), 2);
        assert!(!graph.contains(NodeId(3)));
        assert!(!graph.contains(NodeId(4)));
    }

    #[test]
    fn coincident_points_give_zero_weight() {
        let nodes: OsmNodes = HashMap::from([node(1, 10.0, 10.0), node(2, 10.0, 10.0)]);
        let graph = build_graph(&nodes, &vec![way(1, &[1, 2])]);
        assert_eq!(graph.neighbors(NodeId(1))[0].weight, 0.0);
    }
}
