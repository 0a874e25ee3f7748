// Eulerian analysis: does the graph admit a walk traversing every EDGE
// exactly once? Euler's degree theorem decides the question (all even
// degrees: circuit; exactly two odd: open path) and Hierholzer's
// algorithm constructs the walk when one exists. The historical origin
// is the seven bridges of Königsberg (1736).

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::error::{GraphError, Result};
use crate::core::graph::{EdgeId, Graph, NodeId};
use crate::core::trace::{StepTag, TraceRecorder};

use super::{AlgorithmKind, AlgorithmModule, RunOutcome, RunParams};

/// Outcome of an Eulerian analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum EulerianVerdict {
    /// Closed walk traversing every edge exactly once.
    Circuit { walk: Vec<NodeId> },
    /// Open walk traversing every edge; its endpoints are the two
    /// odd-degree (or in/out-unbalanced) nodes.
    OpenPath { walk: Vec<NodeId> },
    /// The degree conditions rule out any Eulerian walk. Carries the
    /// odd-degree (undirected) or unbalanced (directed) nodes,
    /// ascending.
    NoWalk { unbalanced: Vec<NodeId> },
    /// Degrees pass but the edges span more than one component, so no
    /// single walk can cover them all.
    Disconnected,
}

impl fmt::Display for EulerianVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EulerianVerdict::Circuit { walk } => {
                let ids: Vec<String> = walk.iter().map(|n| n.to_string()).collect();
                write!(
                    f,
                    "Eulerian circuit covering {} edges: {}",
                    walk.len().saturating_sub(1),
                    ids.join(" -> ")
                )
            }
            EulerianVerdict::OpenPath { walk } => {
                let ids: Vec<String> = walk.iter().map(|n| n.to_string()).collect();
                write!(
                    f,
                    "Eulerian path covering {} edges: {}",
                    walk.len().saturating_sub(1),
                    ids.join(" -> ")
                )
            }
            EulerianVerdict::NoWalk { unbalanced } => {
                let ids: Vec<String> = unbalanced.iter().map(|n| n.to_string()).collect();
                write!(
                    f,
                    "no Eulerian circuit or path: {} blocking node(s): {}",
                    unbalanced.len(),
                    ids.join(", ")
                )
            }
            EulerianVerdict::Disconnected => {
                write!(f, "no Eulerian walk: edges span more than one component")
            }
        }
    }
}

/// Decide and construct Eulerian circuits and paths.
pub struct EulerianModule;

impl AlgorithmModule for EulerianModule {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Eulerian
    }

    fn describe(&self) -> &'static str {
        "Eulerian analysis\n\
         Decides whether the graph admits an Eulerian circuit (a closed \
         walk traversing every EDGE exactly once) or an Eulerian path, \
         using Euler's degree theorem: a circuit needs all degrees even, \
         a path exactly two odd-degree nodes (for directed graphs, \
         in-degree/out-degree balance). When a walk exists it is \
         constructed with Hierholzer's algorithm.\n\
         Historical origin: the seven bridges of Königsberg (1736), the \
         first theorem of graph theory."
    }

    fn complexity(&self) -> &'static str {
        "Time: O(E) | Space: O(E)"
    }

    fn validate(&self, graph: &Graph, _params: &RunParams) -> Result<()> {
        // Degree parity over zero edges is vacuous; reject up front.
        if graph.edge_count() == 0 {
            return Err(GraphError::invalid_graph(
                "Eulerian analysis needs at least one edge",
            ));
        }
        Ok(())
    }

    fn run(
        &self,
        graph: &Graph,
        _params: &RunParams,
        recorder: &mut TraceRecorder,
    ) -> Result<RunOutcome> {
        debug!(
            algorithm = "eulerian",
            directed = graph.is_directed(),
            "starting analysis"
        );

        let plan = if graph.is_directed() {
            directed_plan(graph, recorder)
        } else {
            undirected_plan(graph, recorder)
        };

        let (start, closed) = match plan {
            WalkPlan::NoWalk { unbalanced } => {
                return Ok(RunOutcome::Eulerian {
                    verdict: EulerianVerdict::NoWalk { unbalanced },
                })
            }
            WalkPlan::Circuit { start } => (start, true),
            WalkPlan::OpenPath { start } => (start, false),
        };

        let Some((walk, covered)) = hierholzer(graph, start, recorder) else {
            return Ok(RunOutcome::Cancelled);
        };
        // Degrees alone cannot see a second component carrying edges.
        if covered.len() != graph.edge_count() {
            return Ok(RunOutcome::Eulerian {
                verdict: EulerianVerdict::Disconnected,
            });
        }

        recorder.record(StepTag::Path, walk.clone(), covered, None);
        let verdict = if closed {
            EulerianVerdict::Circuit { walk }
        } else {
            EulerianVerdict::OpenPath { walk }
        };
        Ok(RunOutcome::Eulerian { verdict })
    }
}

enum WalkPlan {
    Circuit { start: NodeId },
    OpenPath { start: NodeId },
    NoWalk { unbalanced: Vec<NodeId> },
}

/// Undirected condition: all degrees even (circuit) or exactly two odd
/// (path starting at the lowest odd node). Self-loops add two.
fn undirected_plan(graph: &Graph, recorder: &mut TraceRecorder) -> WalkPlan {
    let mut degree: HashMap<NodeId, usize> = HashMap::new();
    for edge in graph.edges() {
        *degree.entry(edge.source).or_insert(0) += 1;
        *degree.entry(edge.target).or_insert(0) += 1;
    }

    let mut odd: Vec<NodeId> = Vec::new();
    for node in graph.sorted_node_ids() {
        let d = degree.get(&node).copied().unwrap_or(0);
        recorder.record_node_value(StepTag::Visit, node, d as f64);
        if d % 2 == 1 {
            odd.push(node);
        }
    }

    match odd.len() {
        0 => WalkPlan::Circuit {
            start: first_with_edges(graph, &degree),
        },
        2 => WalkPlan::OpenPath { start: odd[0] },
        _ => WalkPlan::NoWalk { unbalanced: odd },
    }
}

/// Directed condition: every node balanced (circuit), or exactly one
/// node with one surplus outgoing edge (path start) and one with one
/// surplus incoming edge (path end).
fn directed_plan(graph: &Graph, recorder: &mut TraceRecorder) -> WalkPlan {
    let mut in_degree: HashMap<NodeId, i64> = HashMap::new();
    let mut out_degree: HashMap<NodeId, i64> = HashMap::new();
    for edge in graph.edges() {
        *out_degree.entry(edge.source).or_insert(0) += 1;
        *in_degree.entry(edge.target).or_insert(0) += 1;
    }

    let mut surplus_out: Vec<NodeId> = Vec::new();
    let mut surplus_in: Vec<NodeId> = Vec::new();
    let mut unbalanced: Vec<NodeId> = Vec::new();
    let mut degree: HashMap<NodeId, usize> = HashMap::new();
    for node in graph.sorted_node_ids() {
        let out = out_degree.get(&node).copied().unwrap_or(0);
        let diff = out - in_degree.get(&node).copied().unwrap_or(0);
        degree.insert(node, out as usize);
        recorder.record_node_value(StepTag::Visit, node, diff as f64);
        match diff {
            0 => {}
            1 => surplus_out.push(node),
            -1 => surplus_in.push(node),
            _ => unbalanced.push(node),
        }
    }

    if surplus_out.is_empty() && surplus_in.is_empty() && unbalanced.is_empty() {
        WalkPlan::Circuit {
            start: first_with_edges(graph, &degree),
        }
    } else if surplus_out.len() == 1 && surplus_in.len() == 1 && unbalanced.is_empty() {
        WalkPlan::OpenPath {
            start: surplus_out[0],
        }
    } else {
        unbalanced.extend(surplus_out);
        unbalanced.extend(surplus_in);
        unbalanced.sort_unstable();
        WalkPlan::NoWalk { unbalanced }
    }
}

/// Lowest node id that touches an edge; circuits may start anywhere on
/// the edge-carrying component.
fn first_with_edges(graph: &Graph, degree: &HashMap<NodeId, usize>) -> NodeId {
    graph
        .sorted_node_ids()
        .into_iter()
        .find(|node| degree.get(node).copied().unwrap_or(0) > 0)
        .unwrap_or(0)
}

/// Hierholzer's walk construction: follow unused edges until stuck,
/// backtrack, splice. Returns the walk and the edges it consumed, or
/// `None` when cancelled.
fn hierholzer(
    graph: &Graph,
    start: NodeId,
    recorder: &mut TraceRecorder,
) -> Option<(Vec<NodeId>, Vec<EdgeId>)> {
    // Per-node unused edge lists, reversed so `pop` expands edges in
    // insertion order.
    let mut remaining: HashMap<NodeId, Vec<(EdgeId, NodeId)>> = HashMap::new();
    for edge in graph.edges().iter().rev() {
        remaining
            .entry(edge.source)
            .or_default()
            .push((edge.id, edge.target));
        if !graph.is_directed() && edge.source != edge.target {
            remaining
                .entry(edge.target)
                .or_default()
                .push((edge.id, edge.source));
        }
    }

    let mut used: HashSet<EdgeId> = HashSet::new();
    let mut covered: Vec<EdgeId> = Vec::new();
    let mut stack: Vec<NodeId> = vec![start];
    let mut walk: Vec<NodeId> = Vec::new();

    while let Some(&node) = stack.last() {
        if recorder.cancelled() {
            return None;
        }
        let next = loop {
            match remaining.get_mut(&node).and_then(|edges| edges.pop()) {
                Some((edge_id, neighbor)) => {
                    // the mirror entry of an already-walked undirected edge
                    if used.insert(edge_id) {
                        break Some((edge_id, neighbor));
                    }
                }
                None => break None,
            }
        };
        match next {
            Some((edge_id, neighbor)) => {
                covered.push(edge_id);
                recorder.record(StepTag::Frontier, vec![neighbor], vec![edge_id], None);
                stack.push(neighbor);
            }
            None => {
                walk.push(node);
                stack.pop();
            }
        }
    }

    walk.reverse();
    Some((walk, covered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library;

    fn run(graph: &Graph) -> RunOutcome {
        let mut recorder = TraceRecorder::begin_run();
        EulerianModule
            .run(graph, &RunParams::default(), &mut recorder)
            .unwrap()
    }

    fn verdict(graph: &Graph) -> EulerianVerdict {
        let RunOutcome::Eulerian { verdict } = run(graph) else {
            panic!("expected an Eulerian outcome");
        };
        verdict
    }

    #[test]
    fn test_konigsberg_has_no_walk() {
        // Euler's original result: all four land masses have odd degree.
        let g = library::konigsberg();
        let EulerianVerdict::NoWalk { unbalanced } = verdict(&g) else {
            panic!("the seven bridges admit no Eulerian walk");
        };
        assert_eq!(unbalanced, g.sorted_node_ids());
    }

    #[test]
    fn test_even_cycle_yields_circuit() {
        let g = library::cycle(4);
        let EulerianVerdict::Circuit { walk } = verdict(&g) else {
            panic!("a cycle graph is an Eulerian circuit");
        };
        assert_eq!(walk.len(), g.edge_count() + 1);
        assert_eq!(walk.first(), walk.last());
        let unique: HashSet<NodeId> = walk.iter().copied().collect();
        assert_eq!(unique.len(), g.node_count());
    }

    #[test]
    fn test_chain_yields_open_path_between_odd_ends() {
        let g = library::chain(3);
        assert_eq!(
            verdict(&g),
            EulerianVerdict::OpenPath {
                walk: vec![0, 1, 2]
            }
        );
    }

    #[test]
    fn test_directed_triangle_is_a_circuit() {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        let c = g.add_node(2.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(b, c, 1.0).unwrap();
        g.add_edge(c, a, 1.0).unwrap();

        assert_eq!(
            verdict(&g),
            EulerianVerdict::Circuit {
                walk: vec![a, b, c, a]
            }
        );
    }

    #[test]
    fn test_directed_open_path_starts_at_surplus_out() {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        let c = g.add_node(2.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(b, c, 1.0).unwrap();

        assert_eq!(
            verdict(&g),
            EulerianVerdict::OpenPath {
                walk: vec![a, b, c]
            }
        );
    }

    #[test]
    fn test_two_disjoint_triangles_are_rejected() {
        // All degrees even, but no single walk can cover both components.
        let mut g = Graph::new();
        let ids: Vec<NodeId> = (0..6).map(|i| g.add_node(i as f64, 0.0, "")).collect();
        for offset in [0, 3] {
            g.add_edge(ids[offset], ids[offset + 1], 1.0).unwrap();
            g.add_edge(ids[offset + 1], ids[offset + 2], 1.0).unwrap();
            g.add_edge(ids[offset + 2], ids[offset], 1.0).unwrap();
        }

        assert_eq!(verdict(&g), EulerianVerdict::Disconnected);
    }

    #[test]
    fn test_walk_traverses_each_edge_once() {
        let g = library::complete(5);
        let EulerianVerdict::Circuit { .. } = verdict(&g) else {
            panic!("K5 has all even degrees");
        };
        let mut recorder = TraceRecorder::begin_run();
        EulerianModule
            .run(&g, &RunParams::default(), &mut recorder)
            .unwrap();
        let trace = recorder.finalize();
        let path_step = trace.iter().find(|s| s.tag == StepTag::Path).unwrap();
        let unique: HashSet<EdgeId> = path_step.edges.iter().copied().collect();
        assert_eq!(unique.len(), g.edge_count());
        assert_eq!(path_step.edges.len(), g.edge_count());
    }

    #[test]
    fn test_edgeless_graph_rejected_before_running() {
        let mut g = Graph::new();
        g.add_node(0.0, 0.0, "");
        let err = EulerianModule
            .validate(&g, &RunParams::default())
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidGraph(_)));
    }
}
