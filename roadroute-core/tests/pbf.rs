use roadroute_core::loading::osm::RecordKind;
use roadroute_core::prelude::*;

/// Four dense nodes (1-4), one plain node (5), ways 10 = [1, 2, 3],
/// 11 = [2, 5] and the single-ref way 12 = [4].
const TINY_PBF: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/tiny.osm.pbf");

fn scan(source: &PbfSource, kind: RecordKind) -> Vec<OsmRecord> {
    let mut records = Vec::new();
    source
        .scan(kind, &mut |record| records.push(record))
        .unwrap();
    records
}

fn coords(record: &OsmRecord) -> (i64, f64, f64) {
    match record {
        OsmRecord::Node {
            id,
            lat: Some(lat),
            lon: Some(lon),
        } => (id.0, *lat, *lon),
        other => panic!("expected a node with coordinates, got {other:?}"),
    }
}

#[test]
fn dense_and_plain_nodes_are_decoded() {
    let source = PbfSource::new(TINY_PBF);
    let nodes = scan(&source, RecordKind::Node);

    let mut decoded: Vec<(i64, f64, f64)> = nodes.iter().map(coords).collect();
    decoded.sort_by_key(|(id, _, _)| *id);

    let expected = [
        (1, 0.0, 0.0),
        (2, 0.0, 1.0),
        (3, 0.0, 2.0),
        (4, 5.0, 5.0),
        (5, 1.0, 1.0),
    ];
    assert_eq!(decoded.len(), expected.len());
    for ((id, lat, lon), (want_id, want_lat, want_lon)) in decoded.iter().zip(expected) {
        assert_eq!(*id, want_id);
        assert!((lat - want_lat).abs() < 1e-7, "node {id} lat {lat}");
        assert!((lon - want_lon).abs() < 1e-7, "node {id} lon {lon}");
    }
}

#[test]
fn ways_keep_their_refs_in_order() {
    let source = PbfSource::new(TINY_PBF);
    let ways = scan(&source, RecordKind::Way);

    assert_eq!(
        ways,
        vec![
            OsmRecord::way(10, [1, 2, 3]),
            OsmRecord::way(11, [2, 5]),
            OsmRecord::way(12, [4]),
        ]
    );
}

#[test]
fn extract_is_ingested_and_routable() {
    let network = create_road_network(&RoadNetworkConfig::new(TINY_PBF)).unwrap();

    let summary = network.summary();
    assert_eq!(summary.node_count, 4);
    assert_eq!(summary.way_count, 2);
    assert_eq!(summary.edge_count, 6);
    assert!(network.node_record(NodeId(4)).is_none());

    let bounds = summary.bounds.unwrap();
    assert!((bounds.max_lat - 1.0).abs() < 1e-7);
    assert!((bounds.max_lon - 2.0).abs() < 1e-7);

    let result = network.find_route(NodeId(1), NodeId(5), false);
    assert_eq!(result.path, Some(vec![NodeId(1), NodeId(2), NodeId(5)]));
}
