mod heap;
pub mod trace;

pub use heap::MinHeap;
pub use trace::{ExploredNode, FrontierEdge, FrontierSnapshot, Relaxation, SearchTrace};

use hashbrown::{HashMap, HashSet, hash_map::Entry};
use log::debug;

use trace::TraceRecorder;

use crate::{
    TraceLimits,
    model::{NodeId, RoadGraph},
    routing::SearchResult,
};

/// Single-source, single-target Dijkstra over the road graph, recording the
/// default-bounded trace when `instrumented` is set.
pub fn find_path(graph: &RoadGraph, start: NodeId, end: NodeId, instrumented: bool) -> SearchResult {
    find_path_with_limits(graph, start, end, instrumented, &TraceLimits::default())
}

/// Dijkstra's algorithm for the shortest path between `start` and `end`.
///
/// Unknown endpoints, disconnected endpoints and `start == end` all produce a
/// result without a path. When `instrumented` is set the search keeps
/// settling nodes for `limits.exploration_overrun()` iterations after the
/// target, so the trace shows the exploration around the route; the returned
/// path and distance are the same either way.
pub fn find_path_with_limits(
    graph: &RoadGraph,
    start: NodeId,
    end: NodeId,
    instrumented: bool,
    limits: &TraceLimits,
) -> SearchResult {
    let mut recorder = instrumented.then(|| TraceRecorder::new(*limits));

    if !graph.contains(start) || !graph.contains(end) {
        return SearchResult::not_found(0, recorder.map(TraceRecorder::finish));
    }

    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeId, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeId, NodeId> = HashMap::with_capacity(estimated_nodes);
    let mut settled: HashSet<NodeId> = HashSet::with_capacity(estimated_nodes);
    let mut heap = MinHeap::with_capacity(estimated_nodes / 4);

    // Start node has distance 0
    distances.insert(start, 0.0);
    heap.insert(start, 0.0);

    let overrun = limits.exploration_overrun();
    let mut iterations = 0usize;
    let mut target_settled_at: Option<usize> = None;

    while let Some((node, cost)) = heap.extract_min() {
        iterations += 1;

        // Stale entry, the node already has its final distance
        if !settled.insert(node) {
            continue;
        }

        let edges = graph.neighbors(node);
        if let Some(recorder) = recorder.as_mut() {
            recorder.settle(node, cost, iterations);
            recorder.frontier(node, cost, edges, iterations);
        }

        if node == end && target_settled_at.is_none() {
            debug!("Route found at iteration {iterations}");
            target_settled_at = Some(iterations);
            if recorder.is_none() {
                break;
            }
        }
        if let Some(found_at) = target_settled_at {
            if iterations > found_at.saturating_add(overrun) {
                debug!("Exploration complete after {iterations} iterations");
                break;
            }
        }

        for edge in edges {
            let next_cost = cost + edge.weight;

            match distances.entry(edge.to) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                    } else {
                        continue;
                    }
                }
            }

            predecessors.insert(edge.to, node);
            heap.insert(edge.to, next_cost);
            if let Some(recorder) = recorder.as_mut() {
                recorder.relax(node, edge.to, next_cost, iterations);
            }
        }
    }

    let trace = recorder.map(TraceRecorder::finish);
    if !settled.contains(&end) {
        return SearchResult::not_found(iterations, trace);
    }

    // Follow predecessors backward from target to start
    let mut path = vec![end];
    let mut current = end;
    while let Some(&prev) = predecessors.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();

    if path.len() <= 1 {
        return SearchResult::not_found(iterations, trace);
    }

    SearchResult {
        path: Some(path),
        distance: distances.get(&end).copied(),
        iterations,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(n: i64) -> RoadGraph {
        let mut graph = RoadGraph::new();
        for i in 1..n {
            graph.add_segment(NodeId(i), NodeId(i + 1), 1.0);
        }
        graph
    }

    #[test]
    fn finds_path_on_linear_graph() {
        let graph = linear(3);
        let result = find_path(&graph, NodeId(1), NodeId(3), false);

        assert_eq!(result.path, Some(vec![NodeId(1), NodeId(2), NodeId(3)]));
        assert_eq!(result.distance, Some(2.0));
        assert!(result.trace.is_none());
    }

    #[test]
    fn instrumented_linear_search_explores_every_node() {
        let graph = linear(3);
        let result = find_path(&graph, NodeId(1), NodeId(3), true);
        let trace = result.trace.expect("trace");

        let explored: Vec<NodeId> = trace.explored.iter().map(|e| e.node).collect();
        assert_eq!(explored, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(trace.relaxations.len(), 2);
        assert_eq!(trace.explored[2].distance, 2.0);
        assert_eq!(trace.recorded_edges(), 4);
        assert_eq!(result.distance, Some(2.0));
    }

    #[test]
    fn prefers_shorter_detour() {
        let mut graph = RoadGraph::new();
        graph.add_segment(NodeId(1), NodeId(2), 10.0);
        graph.add_segment(NodeId(1), NodeId(3), 1.0);
        graph.add_segment(NodeId(3), NodeId(4), 1.0);
        graph.add_segment(NodeId(4), NodeId(2), 1.0);

        let result = find_path(&graph, NodeId(1), NodeId(2), false);
        assert_eq!(
            result.path,
            Some(vec![NodeId(1), NodeId(3), NodeId(4), NodeId(2)])
        );
        assert_eq!(result.distance, Some(3.0));
    }

    #[test]
    fn disconnected_target_has_no_path() {
        let mut graph = linear(3);
        graph.add_segment(NodeId(10), NodeId(11), 1.0);

        let result = find_path(&graph, NodeId(1), NodeId(11), true);
        assert!(result.path.is_none());
        assert!(result.distance.is_none());
        assert_eq!(result.trace.map(|t| t.explored.len()), Some(3));
    }

    #[test]
    fn unknown_or_identical_endpoints_have_no_path() {
        let graph = linear(3);
        assert!(find_path(&graph, NodeId(1), NodeId(99), false).path.is_none());
        assert!(find_path(&graph, NodeId(99), NodeId(1), false).path.is_none());
        assert!(find_path(&graph, NodeId(2), NodeId(2), false).path.is_none());
        assert!(
            find_path(&RoadGraph::new(), NodeId(1), NodeId(2), true)
                .path
                .is_none()
        );
    }

    #[test]
    fn zero_weight_edges_are_allowed() {
        let mut graph = RoadGraph::new();
        graph.add_segment(NodeId(1), NodeId(2), 0.0);
        graph.add_segment(NodeId(2), NodeId(3), 0.0);

        let result = find_path(&graph, NodeId(1), NodeId(3), false);
        assert_eq!(result.distance, Some(0.0));
        assert_eq!(result.path.map(|p| p.len()), Some(3));
    }

    #[test]
    fn instrumented_search_stops_after_overrun() {
        let graph = linear(500);
        let limits = TraceLimits {
            exploration_after_target: 5,
            exploration_multiplier: 2,
            ..TraceLimits::default()
        };

        let plain = find_path_with_limits(&graph, NodeId(1), NodeId(3), false, &limits);
        let traced = find_path_with_limits(&graph, NodeId(1), NodeId(3), true, &limits);

        assert_eq!(plain.path, traced.path);
        assert_eq!(plain.distance, traced.distance);
        assert_eq!(plain.iterations, 3);

        // target settled at iteration 3, stop at first settle past 3 + 10
        let trace = traced.trace.expect("trace");
        assert_eq!(trace.explored.last().map(|e| e.iteration), Some(14));
        assert_eq!(traced.iterations, 14);
    }

    #[test]
    fn unbounded_overrun_explores_whole_component() {
        let graph = linear(50);
        let limits = TraceLimits {
            exploration_after_target: usize::MAX,
            ..TraceLimits::default()
        };

        let result = find_path_with_limits(&graph, NodeId(1), NodeId(3), true, &limits);
        assert_eq!(result.path, Some(vec![NodeId(1), NodeId(2), NodeId(3)]));
        assert_eq!(result.distance, Some(2.0));

        let trace = result.trace.expect("trace");
        assert_eq!(trace.explored.len(), 50);
        assert_eq!(result.iterations, 50);
    }
}
