//! Two-pass reduction of a raw record stream to the nodes and ways the road
//! graph actually needs.
//!
//! The first pass keeps ways with at least two refs and collects every node id
//! they reference. The second pass keeps only coordinates of those nodes, so
//! peak memory follows the number of nodes in use rather than the number of
//! nodes in the extract.

use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};

use super::source::{RecordKind, RecordSource};
use crate::{
    Error,
    model::{NodeId, NodeRecord, OsmNodes, OsmRecord, OsmWays, WayRecord},
};

const WAY_PROGRESS_INTERVAL: usize = 10_000;
const NODE_PROGRESS_INTERVAL: usize = 100_000;

/// Filters a replayable record source down to routable ways and the nodes
/// they reference.
///
/// Ways with fewer than two refs, nodes without coordinates and nodes not
/// referenced by a retained way are dropped silently.
///
/// # Errors
///
/// Returns an error if either pass fails to read the source, including a
/// source that cannot be scanned a second time.
pub fn ingest(source: &dyn RecordSource) -> Result<(OsmNodes, OsmWays), Error> {
    info!("Phase 1: scanning ways to identify used nodes");
    let (ways, referenced) = scan_ways(source)?;
    info!(
        "Phase 1 complete: {} ways, {} unique nodes needed",
        ways.len(),
        referenced.len()
    );

    info!("Phase 2: loading only nodes used in ways");
    let nodes = scan_nodes(source, referenced)?;
    info!("Phase 2 complete: {} nodes stored", nodes.len());

    Ok((nodes, ways))
}

/// First pass: retained ways plus the set of node ids they reference.
pub(crate) fn scan_ways(source: &dyn RecordSource) -> Result<(OsmWays, HashSet<NodeId>), Error> {
    let mut ways = Vec::new();
    let mut referenced = HashSet::new();
    let mut scanned = 0usize;

    source.scan(RecordKind::Way, &mut |record| {
        let OsmRecord::Way { id, refs } = record else {
            return;
        };
        scanned += 1;
        if scanned % WAY_PROGRESS_INTERVAL == 0 {
            debug!("Scanned {scanned} ways");
        }

        if refs.len() < 2 {
            return;
        }
        referenced.extend(refs.iter().copied());
        ways.push(WayRecord { id, refs });
    })?;

    debug!("Skipped {} ways with fewer than 2 refs", scanned - ways.len());
    Ok((ways, referenced))
}

/// Second pass: coordinates of referenced nodes. Consumes the id set, which
/// is released once the pass is over.
pub(crate) fn scan_nodes(
    source: &dyn RecordSource,
    referenced: HashSet<NodeId>,
) -> Result<OsmNodes, Error> {
    let mut nodes: OsmNodes = HashMap::with_capacity(referenced.len());
    let mut scanned = 0usize;

    source.scan(RecordKind::Node, &mut |record| {
        let OsmRecord::Node { id, lat, lon } = record else {
            return;
        };
        scanned += 1;
        if scanned % NODE_PROGRESS_INTERVAL == 0 {
            debug!("Scanned {scanned} nodes, loaded {} used nodes", nodes.len());
        }

        if !referenced.contains(&id) {
            return;
        }
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return;
        };
        if !lat.is_finite() || !lon.is_finite() {
            return;
        }

        if nodes.insert(id, NodeRecord::new(id, lat, lon)).is_some() {
            warn!("node with OSMID {id} occurs more than once in this source");
        }
    })?;

    let missing = referenced.len() - nodes.len();
    if missing > 0 {
        debug!("{missing} referenced nodes have no usable coordinates");
    }
    drop(referenced);

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::osm::source::{MemorySource, OneShotSource};
    use crate::model::WayId;

    fn sample() -> MemorySource {
        MemorySource::new(records())
    }

    fn records() -> Vec<OsmRecord> {
        vec![
            OsmRecord::node(1, 0.0, 0.0),
            OsmRecord::node(2, 0.0, 1.0),
            OsmRecord::node(3, 0.0, 2.0),
            // not referenced by any way
            OsmRecord::node(4, 5.0, 5.0),
            // referenced only by a single-ref way
            OsmRecord::node(5, 6.0, 6.0),
            // referenced but without coordinates
            OsmRecord::Node {
                id: NodeId(6),
                lat: None,
                lon: Some(1.0),
            },
            OsmRecord::way(100, [1, 2, 3]),
            OsmRecord::way(101, [5]),
            OsmRecord::way(102, [3, 6]),
            OsmRecord::way(103, Vec::new()),
        ]
    }

    #[test]
    fn keeps_only_ways_with_two_refs() {
        let (_, ways) = ingest(&sample()).unwrap();
        let ids: Vec<WayId> = ways.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![WayId(100), WayId(102)]);
        assert!(ways.iter().all(|w| w.refs.len() >= 2));
    }

    #[test]
    fn keeps_only_referenced_nodes_with_coordinates() {
        let (nodes, _) = ingest(&sample()).unwrap();
        let mut ids: Vec<i64> = nodes.keys().map(|id| id.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(nodes[&NodeId(2)].lon(), 1.0);
    }

    #[test]
    fn first_pass_collects_referenced_ids() {
        let (ways, referenced) = scan_ways(&sample()).unwrap();
        assert_eq!(ways.len(), 2);
        assert_eq!(referenced.len(), 4);
        assert!(!referenced.contains(&NodeId(5)));
    }

    #[test]
    fn non_finite_coordinates_are_dropped() {
        let source = MemorySource::new(vec![
            OsmRecord::node(1, f64::NAN, 0.0),
            OsmRecord::node(2, 0.0, 0.0),
            OsmRecord::way(1, [1, 2]),
        ]);
        let (nodes, _) = ingest(&source).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes.contains_key(&NodeId(2)));
    }

    #[test]
    fn ingest_is_idempotent() {
        let source = sample();
        let first = ingest(&source).unwrap();
        let second = ingest(&source).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn non_replayable_source_fails() {
        let source = OneShotSource::new(records());
        assert!(matches!(ingest(&source), Err(Error::StreamNotReplayable)));
    }
}
