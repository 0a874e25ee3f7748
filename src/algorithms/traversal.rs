// Depth-first and breadth-first traversal modules.
//
// Both share the frontier/visited pattern; the only difference is the
// frontier discipline (LIFO stack vs FIFO queue). Neighbor expansion
// order is the edge insertion order, which makes both deterministic.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::common::error::Result;
use crate::core::graph::{Graph, NodeId};
use crate::core::trace::{StepTag, TraceRecorder};

use super::{AlgorithmKind, AlgorithmModule, RunOutcome, RunParams};

/// Depth-first search: explore as far as possible along each branch
/// before backtracking.
pub struct DfsModule;

impl AlgorithmModule for DfsModule {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Dfs
    }

    fn describe(&self) -> &'static str {
        "Depth-First Search (DFS)\n\
         Explores a graph by going as deep as possible along each branch \
         before backtracking, using a stack. Cycles are handled by tracking \
         a visited set.\n\
         Applications: cycle detection, topological sorting, connected \
         components."
    }

    fn complexity(&self) -> &'static str {
        "Time: O(V + E) | Space: O(V)"
    }

    fn validate(&self, graph: &Graph, params: &RunParams) -> Result<()> {
        params.resolve_start(graph)?;
        Ok(())
    }

    fn run(
        &self,
        graph: &Graph,
        params: &RunParams,
        recorder: &mut TraceRecorder,
    ) -> Result<RunOutcome> {
        let start = params.resolve_start(graph)?;
        debug!(algorithm = "dfs", start, "starting traversal");

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut order: Vec<NodeId> = Vec::new();
        let mut stack: Vec<NodeId> = vec![start];
        recorder.record_node(StepTag::Frontier, start);

        while let Some(node) = stack.pop() {
            if recorder.cancelled() {
                return Ok(RunOutcome::Cancelled);
            }
            if !visited.insert(node) {
                continue;
            }
            order.push(node);
            recorder.record_node(StepTag::Visit, node);

            // Push unvisited neighbors in reverse insertion order so the
            // first-inserted edge is expanded first, matching the
            // recursive left-to-right traversal order.
            let outgoing = graph.outgoing_edges(node)?;
            for (edge, neighbor) in outgoing.into_iter().rev() {
                if !visited.contains(&neighbor) {
                    stack.push(neighbor);
                    recorder.record(StepTag::Frontier, vec![neighbor], vec![edge.id], None);
                }
            }
        }

        Ok(RunOutcome::Traversal { start, order })
    }
}

/// Breadth-first search: explore the graph level by level, guaranteeing
/// shortest-edge-count order from the start node.
pub struct BfsModule;

impl AlgorithmModule for BfsModule {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Bfs
    }

    fn describe(&self) -> &'static str {
        "Breadth-First Search (BFS)\n\
         Explores a graph level by level, visiting all direct neighbors \
         before moving on to the neighbors' neighbors, using a FIFO queue. \
         The visitation order is non-decreasing in edge-count distance \
         from the start node.\n\
         Applications: shortest paths in unweighted graphs, minimum hop \
         distance."
    }

    fn complexity(&self) -> &'static str {
        "Time: O(V + E) | Space: O(V)"
    }

    fn validate(&self, graph: &Graph, params: &RunParams) -> Result<()> {
        params.resolve_start(graph)?;
        Ok(())
    }

    fn run(
        &self,
        graph: &Graph,
        params: &RunParams,
        recorder: &mut TraceRecorder,
    ) -> Result<RunOutcome> {
        let start = params.resolve_start(graph)?;
        debug!(algorithm = "bfs", start, "starting traversal");

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut order: Vec<NodeId> = Vec::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);
        recorder.record_node(StepTag::Frontier, start);

        while let Some(node) = queue.pop_front() {
            if recorder.cancelled() {
                return Ok(RunOutcome::Cancelled);
            }
            order.push(node);
            recorder.record_node(StepTag::Visit, node);

            for (edge, neighbor) in graph.outgoing_edges(node)? {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                    recorder.record(StepTag::Frontier, vec![neighbor], vec![edge.id], None);
                }
            }
        }

        Ok(RunOutcome::Traversal { start, order })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::core::trace::Trace;

    fn run_module(
        module: &dyn AlgorithmModule,
        graph: &Graph,
        params: RunParams,
    ) -> (RunOutcome, Trace) {
        module.validate(graph, &params).unwrap();
        let mut recorder = TraceRecorder::begin_run();
        let outcome = module.run(graph, &params, &mut recorder).unwrap();
        (outcome, recorder.finalize())
    }

    /// A->B (5), B->C (3), A->C (10).
    fn triangle() -> (Graph, NodeId, NodeId, NodeId) {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "A");
        let b = g.add_node(1.0, 0.0, "B");
        let c = g.add_node(2.0, 0.0, "C");
        g.add_edge(a, b, 5.0).unwrap();
        g.add_edge(b, c, 3.0).unwrap();
        g.add_edge(a, c, 10.0).unwrap();
        (g, a, b, c)
    }

    #[test]
    fn test_dfs_insertion_order_traversal() {
        let (g, a, b, c) = triangle();
        let (outcome, _) = run_module(&DfsModule, &g, RunParams::from_start(a));
        assert_eq!(
            outcome,
            RunOutcome::Traversal {
                start: a,
                order: vec![a, b, c]
            }
        );
    }

    #[test]
    fn test_dfs_goes_deep_first() {
        // a -> b -> d, a -> c; DFS must finish the b-branch before c.
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        let c = g.add_node(2.0, 0.0, "");
        let d = g.add_node(3.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(a, c, 1.0).unwrap();
        g.add_edge(b, d, 1.0).unwrap();

        let (outcome, _) = run_module(&DfsModule, &g, RunParams::from_start(a));
        assert_eq!(
            outcome,
            RunOutcome::Traversal {
                start: a,
                order: vec![a, b, d, c]
            }
        );
    }

    #[test]
    fn test_bfs_level_order() {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        let c = g.add_node(2.0, 0.0, "");
        let d = g.add_node(3.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(a, c, 1.0).unwrap();
        g.add_edge(b, d, 1.0).unwrap();

        let (outcome, _) = run_module(&BfsModule, &g, RunParams::from_start(a));
        assert_eq!(
            outcome,
            RunOutcome::Traversal {
                start: a,
                order: vec![a, b, c, d]
            }
        );
    }

    #[test]
    fn test_traversal_terminates_on_cycles() {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(b, a, 1.0).unwrap();

        for module in [&DfsModule as &dyn AlgorithmModule, &BfsModule] {
            let (outcome, _) = run_module(module, &g, RunParams::from_start(a));
            assert_eq!(
                outcome,
                RunOutcome::Traversal {
                    start: a,
                    order: vec![a, b]
                }
            );
        }
    }

    #[test]
    fn test_traversal_visits_each_reachable_node_once() {
        // Diamond plus an unreachable node.
        let mut g = Graph::with_directed(true);
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(1.0, 0.0, "");
        let c = g.add_node(2.0, 0.0, "");
        let d = g.add_node(3.0, 0.0, "");
        let isolated = g.add_node(4.0, 0.0, "");
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(a, c, 1.0).unwrap();
        g.add_edge(b, d, 1.0).unwrap();
        g.add_edge(c, d, 1.0).unwrap();

        for module in [&DfsModule as &dyn AlgorithmModule, &BfsModule] {
            let (outcome, _) = run_module(module, &g, RunParams::from_start(a));
            let RunOutcome::Traversal { order, .. } = outcome else {
                panic!("expected traversal outcome");
            };
            let unique: HashSet<NodeId> = order.iter().copied().collect();
            assert_eq!(unique.len(), order.len());
            assert_eq!(unique, HashSet::from([a, b, c, d]));
            assert!(!unique.contains(&isolated));
        }
    }

    #[test]
    fn test_visit_steps_match_order() {
        let (g, a, ..) = triangle();
        let (outcome, trace) = run_module(&BfsModule, &g, RunParams::from_start(a));
        let RunOutcome::Traversal { order, .. } = outcome else {
            panic!("expected traversal outcome");
        };
        let visits: Vec<NodeId> = trace
            .iter()
            .filter(|s| s.tag == StepTag::Visit)
            .map(|s| s.nodes[0])
            .collect();
        assert_eq!(visits, order);
    }

    #[test]
    fn test_invalid_start_rejected_before_running() {
        let (g, ..) = triangle();
        let params = RunParams::from_start(99);
        assert!(DfsModule.validate(&g, &params).is_err());
        assert!(BfsModule.validate(&g, &params).is_err());
    }

    #[test]
    fn test_cancellation_yields_cancelled_outcome() {
        let (g, a, ..) = triangle();
        let flag = Arc::new(AtomicBool::new(true));
        let mut recorder = TraceRecorder::with_cancel_token(flag.clone());
        let outcome = DfsModule
            .run(&g, &RunParams::from_start(a), &mut recorder)
            .unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled);

        flag.store(false, Ordering::Relaxed);
        let mut recorder = TraceRecorder::with_cancel_token(flag);
        let outcome = DfsModule
            .run(&g, &RunParams::from_start(a), &mut recorder)
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Traversal { .. }));
    }
}
