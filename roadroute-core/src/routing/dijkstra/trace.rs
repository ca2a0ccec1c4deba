//! Bounded record of an instrumented search, used to animate the exploration.
//!
//! Nothing in here influences the search itself.

use serde::Serialize;

use crate::{
    TraceLimits,
    model::{Edge, NodeId},
};

/// Node settled by the search
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExploredNode {
    pub node: NodeId,
    pub distance: f64,
    pub iteration: usize,
}

/// Tentative distance of `to` improved through `from`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Relaxation {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: f64,
    pub iteration: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrontierEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Distance of `center` plus the edge weight
    pub distance: f64,
}

/// Sampled outgoing edges of a settled node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontierSnapshot {
    pub iteration: usize,
    pub center: NodeId,
    pub edges: Vec<FrontierEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchTrace {
    pub explored: Vec<ExploredNode>,
    pub relaxations: Vec<Relaxation>,
    pub frontier: Vec<FrontierSnapshot>,
}

impl SearchTrace {
    /// Total number of frontier edges across all snapshots
    pub fn recorded_edges(&self) -> usize {
        self.frontier.iter().map(|snapshot| snapshot.edges.len()).sum()
    }
}

pub(super) struct TraceRecorder {
    limits: TraceLimits,
    recorded_edges: usize,
    trace: SearchTrace,
}

impl TraceRecorder {
    pub(super) fn new(limits: TraceLimits) -> Self {
        Self {
            limits,
            recorded_edges: 0,
            trace: SearchTrace::default(),
        }
    }

    pub(super) fn settle(&mut self, node: NodeId, distance: f64, iteration: usize) {
        self.trace.explored.push(ExploredNode {
            node,
            distance,
            iteration,
        });
    }

    pub(super) fn relax(&mut self, from: NodeId, to: NodeId, distance: f64, iteration: usize) {
        self.trace.relaxations.push(Relaxation {
            from,
            to,
            distance,
            iteration,
        });
    }

    /// Records a sample of `center`'s outgoing edges.
    ///
    /// Every edge is kept while fewer than `dense_recording_threshold` edges
    /// have been recorded, afterwards only every `degree / sample_divisor`-th
    /// one. Nothing is kept once `max_recorded_edges` is reached.
    pub(super) fn frontier(
        &mut self,
        center: NodeId,
        center_distance: f64,
        edges: &[Edge],
        iteration: usize,
    ) {
        if self.recorded_edges >= self.limits.max_recorded_edges {
            return;
        }

        let sample_rate = (edges.len() / self.limits.sample_divisor.max(1)).max(1);
        let mut sampled = Vec::new();
        for (idx, edge) in edges.iter().enumerate() {
            if self.recorded_edges >= self.limits.max_recorded_edges {
                break;
            }
            if idx % sample_rate == 0 || self.recorded_edges < self.limits.dense_recording_threshold
            {
                sampled.push(FrontierEdge {
                    from: center,
                    to: edge.to,
                    distance: center_distance + edge.weight,
                });
                self.recorded_edges += 1;
            }
        }

        if !sampled.is_empty() {
            self.trace.frontier.push(FrontierSnapshot {
                iteration,
                center,
                edges: sampled,
            });
        }
    }

    pub(super) fn finish(self) -> SearchTrace {
        self.trace
    }
}
