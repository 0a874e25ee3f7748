// Connected components via iterative DFS labelling.
//
// Classroom semantics: reachability is taken over undirected edges even
// when the graph is directed (weak connectivity), so "component" always
// means "nodes you could reach ignoring arrow directions".

use std::collections::HashMap;

use tracing::debug;

use crate::common::error::Result;
use crate::core::graph::{Graph, NodeId};
use crate::core::trace::{StepTag, TraceRecorder};

use super::{AlgorithmKind, AlgorithmModule, RunOutcome, RunParams};

/// Partition the node set into connected components.
pub struct ConnectedComponentsModule;

impl AlgorithmModule for ConnectedComponentsModule {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::ConnectedComponents
    }

    fn describe(&self) -> &'static str {
        "Connected components\n\
         Identifies the groups of mutually reachable nodes: two nodes \
         belong to the same component when a path exists between them, \
         ignoring edge directions. A connected graph has exactly one \
         component.\n\
         Algorithm: DFS from every unlabelled node."
    }

    fn complexity(&self) -> &'static str {
        "Time: O(V + E) | Space: O(V)"
    }

    fn validate(&self, _graph: &Graph, _params: &RunParams) -> Result<()> {
        // Runs on any graph, including the empty one; no parameters.
        Ok(())
    }

    fn run(
        &self,
        graph: &Graph,
        _params: &RunParams,
        recorder: &mut TraceRecorder,
    ) -> Result<RunOutcome> {
        debug!(algorithm = "connected-components", "starting run");

        let mut component_of: HashMap<NodeId, usize> = HashMap::new();
        let mut components: Vec<Vec<NodeId>> = Vec::new();

        for start in graph.sorted_node_ids() {
            if component_of.contains_key(&start) {
                continue;
            }
            if recorder.cancelled() {
                return Ok(RunOutcome::Cancelled);
            }

            let component_index = components.len();
            let mut members: Vec<NodeId> = Vec::new();
            let mut stack = vec![start];
            component_of.insert(start, component_index);

            while let Some(node) = stack.pop() {
                members.push(node);
                recorder.record_node_value(StepTag::Visit, node, component_index as f64);
                for edge in graph.incident_edges(node)? {
                    let neighbor = edge.other_endpoint(node).unwrap_or(node);
                    if !component_of.contains_key(&neighbor) {
                        component_of.insert(neighbor, component_index);
                        stack.push(neighbor);
                    }
                }
            }

            members.sort_unstable();
            recorder.record(
                StepTag::Component,
                members.clone(),
                Vec::new(),
                Some(component_index as f64),
            );
            components.push(members);
        }

        Ok(RunOutcome::Components { components })
    }
}
