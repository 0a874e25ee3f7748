// Cycle detection.
//
// Directed graphs use a DFS recursion stack: every back edge into the
// current path closes a cycle. Undirected graphs use a DFS that skips
// the edge it arrived by, so a revisited node means a genuine cycle
// rather than the trivial there-and-back.

use std::collections::HashSet;

use tracing::debug;

use crate::common::error::Result;
use crate::core::graph::{Graph, NodeId};
use crate::core::trace::{StepTag, TraceRecorder};

use super::{AlgorithmKind, AlgorithmModule, RunOutcome, RunParams};

/// Find the elementary cycles of a graph.
pub struct CycleDetectionModule;

impl AlgorithmModule for CycleDetectionModule {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::CycleDetection
    }

    fn describe(&self) -> &'static str {
        "Cycle detection\n\
         Searches the graph for cycles: closed walks that revisit their \
         starting node. Directed graphs are searched with a DFS recursion \
         stack (every back edge closes a cycle); undirected graphs skip \
         the edge they arrived by so a single edge never counts as a \
         cycle.\n\
         Applications: deadlock detection, dependency analysis, DAG \
         verification."
    }

    fn complexity(&self) -> &'static str {
        "Time: O(V + E) per DFS sweep | Space: O(V)"
    }

    fn validate(&self, _graph: &Graph, _params: &RunParams) -> Result<()> {
        Ok(())
    }

    fn run(
        &self,
        graph: &Graph,
        _params: &RunParams,
        recorder: &mut TraceRecorder,
    ) -> Result<RunOutcome> {
        debug!(
            algorithm = "cycle-detection",
            directed = graph.is_directed(),
            "starting run"
        );

        let mut search = CycleSearch {
            graph,
            recorder,
            visited: HashSet::new(),
            path: Vec::new(),
            on_path: HashSet::new(),
            seen_normalized: HashSet::new(),
            cycles: Vec::new(),
            cancelled: false,
        };

        for start in graph.sorted_node_ids() {
            if !search.visited.contains(&start) {
                if graph.is_directed() {
                    search.directed_dfs(start)?;
                } else {
                    search.undirected_dfs(start, None)?;
                }
            }
            if search.cancelled {
                return Ok(RunOutcome::Cancelled);
            }
        }

        Ok(RunOutcome::Cycles {
            cycles: search.cycles,
        })
    }
}

struct CycleSearch<'a, 'r> {
    graph: &'a Graph,
    recorder: &'r mut TraceRecorder,
    visited: HashSet<NodeId>,
    path: Vec<NodeId>,
    on_path: HashSet<NodeId>,
    /// Normalized forms of cycles already reported, for deduplication.
    seen_normalized: HashSet<Vec<NodeId>>,
    cycles: Vec<Vec<NodeId>>,
    cancelled: bool,
}

impl CycleSearch<'_, '_> {
    fn directed_dfs(&mut self, node: NodeId) -> Result<()> {
        if self.recorder.cancelled() {
            self.cancelled = true;
            return Ok(());
        }
        self.visited.insert(node);
        self.on_path.insert(node);
        self.path.push(node);
        self.recorder.record_node(StepTag::Visit, node);

        for neighbor in self.graph.neighbors(node)? {
            if self.cancelled {
                break;
            }
            if !self.visited.contains(&neighbor) {
                self.directed_dfs(neighbor)?;
            } else if self.on_path.contains(&neighbor) {
                // back edge: the path slice from `neighbor` onward is a cycle
                if let Some(pos) = self.path.iter().position(|&n| n == neighbor) {
                    let cycle = self.path[pos..].to_vec();
                    self.report(cycle);
                }
            }
        }

        self.path.pop();
        self.on_path.remove(&node);
        Ok(())
    }

    fn undirected_dfs(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<()> {
        if self.recorder.cancelled() {
            self.cancelled = true;
            return Ok(());
        }
        self.visited.insert(node);
        self.on_path.insert(node);
        self.path.push(node);
        self.recorder.record_node(StepTag::Visit, node);

        let mut parent_skipped = false;
        for neighbor in self.graph.neighbors(node)? {
            if self.cancelled {
                break;
            }
            // A self-loop is a one-node cycle in its own right.
            if neighbor == node {
                self.report(vec![node]);
                continue;
            }
            // Skip the edge we arrived by exactly once; a second edge to
            // the parent is a genuine two-node cycle of parallel edges.
            if Some(neighbor) == parent && !parent_skipped {
                parent_skipped = true;
                continue;
            }
            if !self.visited.contains(&neighbor) {
                self.undirected_dfs(neighbor, Some(node))?;
            } else if self.on_path.contains(&neighbor) {
                if let Some(pos) = self.path.iter().position(|&n| n == neighbor) {
                    let cycle = self.path[pos..].to_vec();
                    if cycle.len() >= 2 {
                        self.report(cycle);
                    }
                }
            }
        }

        self.path.pop();
        self.on_path.remove(&node);
        Ok(())
    }

    /// Record and store a cycle unless an equivalent one (same nodes up
    /// to rotation and direction) was already reported.
    fn report(&mut self, cycle: Vec<NodeId>) {
        if !self.seen_normalized.insert(normalize_cycle(&cycle)) {
            return;
        }
        let edges: Vec<_> = cycle
            .windows(2)
            .chain(std::iter::once(
                &[cycle[cycle.len() - 1], cycle[0]][..],
            ))
            .filter_map(|pair| self.graph.edge_between(pair[0], pair[1]))
            .map(|e| e.id)
            .collect();
        self.recorder
            .record(StepTag::Cycle, cycle.clone(), edges, None);

        // report the cycle closed, with the first node repeated last
        let mut closed = cycle;
        closed.push(closed[0]);
        self.cycles.push(closed);
    }
}

/// Canonical form of a cycle: rotated to start at the smallest id, in
/// the direction that compares lower, so rotations and reversals of the
/// same cycle collapse to one key.
fn normalize_cycle(cycle: &[NodeId]) -> Vec<NodeId> {
    if cycle.is_empty() {
        return Vec::new();
    }
    let min_pos = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, &n)| n)
        .map(|(i, _)| i)
        .unwrap_or(0);

    let forward: Vec<NodeId> = (0..cycle.len())
        .map(|i| cycle[(min_pos + i) % cycle.len()])
        .collect();
    let backward: Vec<NodeId> = (0..cycle.len())
        .map(|i| cycle[(min_pos + cycle.len() - i) % cycle.len()])
        .collect();
    forward.min(backward)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(graph: &Graph) -> RunOutcome {
        let mut recorder = TraceRecorder::begin_run();
        CycleDetectionModule
            .run(graph, &RunParams::default(), &mut recorder)
            .unwrap()
    }

    #[test]
    fn test_directed_cycle_found() {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        let c = g.add_node(2.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(b, c, 1.0).unwrap();
        g.add_edge(c, a, 1.0).unwrap();

        assert_eq!(
            run(&g),
            RunOutcome::Cycles {
                cycles: vec![vec![a, b, c, a]]
            }
        );
    }

    #[test]
    fn test_directed_dag_has_no_cycle() {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        let c = g.add_node(2.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(a, c, 1.0).unwrap();
        g.add_edge(b, c, 1.0).unwrap();

        assert_eq!(run(&g), RunOutcome::Cycles { cycles: Vec::new() });
    }

    #[test]
    fn test_undirected_single_edge_is_not_a_cycle() {
        let mut g = Graph::new();
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();

        assert_eq!(run(&g), RunOutcome::Cycles { cycles: Vec::new() });
    }

    #[test]
    fn test_undirected_triangle_reported_once() {
        let mut g = Graph::new();
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        let c = g.add_node(2.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(b, c, 1.0).unwrap();
        g.add_edge(c, a, 1.0).unwrap();

        let RunOutcome::Cycles { cycles } = run(&g) else {
            panic!("expected cycles outcome");
        };
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 4);
        assert_eq!(cycles[0].first(), cycles[0].last());
    }

    #[test]
    fn test_self_loop_is_a_directed_cycle() {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        g.add_edge(a, a, 1.0).unwrap();

        assert_eq!(
            run(&g),
            RunOutcome::Cycles {
                cycles: vec![vec![a, a]]
            }
        );
    }

    #[test]
    fn test_self_loop_is_an_undirected_cycle() {
        let mut g = Graph::new();
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(b, b, 1.0).unwrap();

        assert_eq!(
            run(&g),
            RunOutcome::Cycles {
                cycles: vec![vec![b, b]]
            }
        );
    }

    #[test]
    fn test_normalize_collapses_rotations_and_reversals() {
        assert_eq!(normalize_cycle(&[2, 0, 1]), normalize_cycle(&[0, 1, 2]));
        assert_eq!(normalize_cycle(&[2, 1, 0]), normalize_cycle(&[0, 1, 2]));
        assert_ne!(normalize_cycle(&[0, 1, 3]), normalize_cycle(&[0, 1, 2]));
    }

    #[test]
    fn test_cycle_steps_highlight_edges() {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(b, a, 1.0).unwrap();

        let mut recorder = TraceRecorder::begin_run();
        CycleDetectionModule
            .run(&g, &RunParams::default(), &mut recorder)
            .unwrap();
        let trace = recorder.finalize();
        let cycle_step = trace.iter().find(|s| s.tag == StepTag::Cycle).unwrap();
        assert_eq!(cycle_step.nodes, vec![a, b]);
        assert_eq!(cycle_step.edges.len(), 2);
    }
}
