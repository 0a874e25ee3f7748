// Shortest-path modules: Dijkstra and Bellman-Ford.
//
// Both keep per-node tentative distances and predecessor pointers and
// reconstruct the result path from them. Dijkstra requires non-negative
// weights and rejects the graph up front; Bellman-Ford tolerates negative
// weights and turns a reachable negative cycle into a distinct error.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::common::error::{GraphError, Result};
use crate::core::graph::{Graph, NodeId};
use crate::core::trace::{StepTag, TraceRecorder};

use super::{AlgorithmKind, AlgorithmModule, DistanceEntry, RunOutcome, RunParams};

/// Dijkstra's single-source shortest paths over non-negative weights.
pub struct DijkstraModule;

impl AlgorithmModule for DijkstraModule {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Dijkstra
    }

    fn describe(&self) -> &'static str {
        "Dijkstra's algorithm\n\
         Finds shortest paths in a weighted graph by settling nodes in \
         order of increasing tentative distance, using a priority queue. \
         With an end node it reports the reconstructed path and its cost; \
         without one it reports the full distance table.\n\
         Limitation: requires non-negative edge weights."
    }

    fn complexity(&self) -> &'static str {
        "Time: O((V + E) log V) | Space: O(V)"
    }

    fn validate(&self, graph: &Graph, params: &RunParams) -> Result<()> {
        params.resolve_start(graph)?;
        params.resolve_end(graph)?;
        // Correctness requires non-negative weights; reject the whole
        // graph before a single step is recorded.
        for edge in graph.edges() {
            if edge.weight < 0.0 {
                return Err(GraphError::invalid_graph(format!(
                    "edge {}->{} has negative weight {}; Dijkstra requires non-negative weights",
                    edge.source, edge.target, edge.weight
                )));
            }
        }
        Ok(())
    }

    fn run(
        &self,
        graph: &Graph,
        params: &RunParams,
        recorder: &mut TraceRecorder,
    ) -> Result<RunOutcome> {
        let start = params.resolve_start(graph)?;
        let end = params.resolve_end(graph)?;
        debug!(algorithm = "dijkstra", start, ?end, "starting run");

        let mut dist: HashMap<NodeId, f64> = HashMap::new();
        let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
        let mut settled: HashSet<NodeId> = HashSet::new();
        // Min-heap keyed by (distance, node id): equal distances settle
        // the lowest id first.
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();

        dist.insert(start, 0.0);
        heap.push(Reverse((OrderedFloat(0.0), start)));

        while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
            if recorder.cancelled() {
                return Ok(RunOutcome::Cancelled);
            }
            if !settled.insert(node) {
                continue; // stale heap entry
            }
            recorder.record_node_value(StepTag::Settle, node, cost);

            for (edge, neighbor) in graph.outgoing_edges(node)? {
                if settled.contains(&neighbor) {
                    continue;
                }
                let candidate = cost + edge.weight;
                let current = dist.get(&neighbor).copied().unwrap_or(f64::INFINITY);
                if candidate < current {
                    dist.insert(neighbor, candidate);
                    previous.insert(neighbor, node);
                    heap.push(Reverse((OrderedFloat(candidate), neighbor)));
                    recorder.record(
                        StepTag::Relax,
                        vec![neighbor],
                        vec![edge.id],
                        Some(candidate),
                    );
                }
            }
        }

        match end {
            Some(end) => finish_path_query(graph, start, end, &dist, &previous, recorder),
            None => Ok(distance_table(graph, start, &dist, &previous)),
        }
    }
}

/// Bellman-Ford single-source shortest paths with negative-cycle
/// detection.
pub struct BellmanFordModule;

impl AlgorithmModule for BellmanFordModule {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::BellmanFord
    }

    fn describe(&self) -> &'static str {
        "Bellman-Ford algorithm\n\
         Finds shortest paths by relaxing every edge |V|-1 times, in a \
         fixed deterministic order. Handles negative edge weights, and a \
         final extra pass detects negative-weight cycles reachable from \
         the start node, which make shortest paths unbounded."
    }

    fn complexity(&self) -> &'static str {
        "Time: O(V * E) | Space: O(V)"
    }

    fn validate(&self, graph: &Graph, params: &RunParams) -> Result<()> {
        params.resolve_start(graph)?;
        params.resolve_end(graph)?;
        Ok(())
    }

    fn run(
        &self,
        graph: &Graph,
        params: &RunParams,
        recorder: &mut TraceRecorder,
    ) -> Result<RunOutcome> {
        let start = params.resolve_start(graph)?;
        let end = params.resolve_end(graph)?;
        debug!(algorithm = "bellman-ford", start, ?end, "starting run");

        let mut dist: HashMap<NodeId, f64> = HashMap::new();
        let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
        dist.insert(start, 0.0);

        let passes = graph.node_count().saturating_sub(1);
        for _pass in 0..passes {
            for edge in graph.edges() {
                if recorder.cancelled() {
                    return Ok(RunOutcome::Cancelled);
                }
                let mut improved = false;
                for (u, v) in edge_orientations(graph, edge.source, edge.target) {
                    if let Some(candidate) = relax(&dist, u, v, edge.weight) {
                        dist.insert(v, candidate);
                        previous.insert(v, u);
                        recorder.record(StepTag::Relax, vec![v], vec![edge.id], Some(candidate));
                        improved = true;
                    }
                }
                if !improved {
                    recorder.record_edge(StepTag::NoChange, edge.id, None);
                }
            }
        }

        // Detection pass: any further possible relaxation means a
        // negative cycle is reachable from the start node.
        for edge in graph.edges() {
            for (u, v) in edge_orientations(graph, edge.source, edge.target) {
                if relax(&dist, u, v, edge.weight).is_some() {
                    let cycle = trace_negative_cycle(graph, v, &previous);
                    return Err(GraphError::NegativeCycleDetected { cycle });
                }
            }
        }

        match end {
            Some(end) => finish_path_query(graph, start, end, &dist, &previous, recorder),
            None => Ok(distance_table(graph, start, &dist, &previous)),
        }
    }
}

/// Orientations an edge is relaxed in: one for directed graphs, both for
/// undirected.
fn edge_orientations(graph: &Graph, source: NodeId, target: NodeId) -> Vec<(NodeId, NodeId)> {
    if graph.is_directed() {
        vec![(source, target)]
    } else {
        vec![(source, target), (target, source)]
    }
}

/// Improved distance for `v` through `u`, or `None` when the relaxation
/// changes nothing.
fn relax(dist: &HashMap<NodeId, f64>, u: NodeId, v: NodeId, weight: f64) -> Option<f64> {
    let du = dist.get(&u).copied().unwrap_or(f64::INFINITY);
    if du.is_infinite() {
        return None;
    }
    let candidate = du + weight;
    let dv = dist.get(&v).copied().unwrap_or(f64::INFINITY);
    (candidate < dv).then_some(candidate)
}

/// Walk predecessor pointers from a node known to be on or behind a
/// negative cycle until a node repeats, then slice out the cycle.
fn trace_negative_cycle(
    graph: &Graph,
    from: NodeId,
    previous: &HashMap<NodeId, NodeId>,
) -> Vec<NodeId> {
    // After |V| predecessor hops we are guaranteed to sit inside the cycle.
    let mut node = from;
    for _ in 0..graph.node_count() {
        match previous.get(&node) {
            Some(&prev) => node = prev,
            None => break,
        }
    }
    let anchor = node;
    let mut cycle = vec![anchor];
    let mut current = anchor;
    while let Some(&prev) = previous.get(&current) {
        if prev == anchor {
            break;
        }
        cycle.push(prev);
        current = prev;
    }
    cycle.reverse();
    cycle
}

/// Reconstruct the path to `end` from predecessor pointers, record the
/// `Path` step, and report `Unreachable` when the distance stayed
/// infinite.
fn finish_path_query(
    graph: &Graph,
    start: NodeId,
    end: NodeId,
    dist: &HashMap<NodeId, f64>,
    previous: &HashMap<NodeId, NodeId>,
    recorder: &mut TraceRecorder,
) -> Result<RunOutcome> {
    let Some(&cost) = dist.get(&end) else {
        return Ok(RunOutcome::Unreachable {
            from: start,
            to: end,
        });
    };

    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match previous.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => {
                return Ok(RunOutcome::Unreachable {
                    from: start,
                    to: end,
                })
            }
        }
    }
    path.reverse();

    let path_edges: Vec<_> = path
        .windows(2)
        .filter_map(|pair| graph.edge_between(pair[0], pair[1]))
        .map(|e| e.id)
        .collect();
    recorder.record(StepTag::Path, path.clone(), path_edges, Some(cost));

    Ok(RunOutcome::ShortestPath { path, cost })
}

/// Full distance table in ascending node-id order.
fn distance_table(
    graph: &Graph,
    start: NodeId,
    dist: &HashMap<NodeId, f64>,
    previous: &HashMap<NodeId, NodeId>,
) -> RunOutcome {
    let entries = graph
        .sorted_node_ids()
        .into_iter()
        .map(|node| DistanceEntry {
            node,
            distance: dist.get(&node).copied(),
            predecessor: previous.get(&node).copied(),
        })
        .collect();
    RunOutcome::Distances { start, entries }
}
