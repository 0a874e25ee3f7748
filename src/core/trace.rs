// Execution trace - the ordered, replayable record of an algorithm's
// internal steps. The recorder knows nothing about algorithm semantics;
// steps are opaque tag/id bundles the visualization layer interprets.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::graph::{EdgeId, NodeId};

/// Semantic tag attached to a step's highlighted ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepTag {
    /// A node was visited (traversals) - its state became final.
    Visit,
    /// A node entered the frontier (stack push / queue enqueue).
    Frontier,
    /// A node's shortest distance was finalized (Dijkstra).
    Settle,
    /// An edge relaxation improved a tentative distance.
    Relax,
    /// An edge relaxation was attempted and changed nothing.
    NoChange,
    /// The nodes/edges form part of a reconstructed result path.
    Path,
    /// The nodes belong to one connected component.
    Component,
    /// The nodes/edges form a detected cycle.
    Cycle,
}

impl StepTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepTag::Visit => "visit",
            StepTag::Frontier => "frontier",
            StepTag::Settle => "settle",
            StepTag::Relax => "relax",
            StepTag::NoChange => "no_change",
            StepTag::Path => "path",
            StepTag::Component => "component",
            StepTag::Cycle => "cycle",
        }
    }
}

impl std::fmt::Display for StepTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic recorded state change within a trace.
///
/// The common envelope every algorithm-defined step follows: a sequence
/// index, tagged node/edge id sets, and an optional scalar payload
/// (e.g. a tentative distance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub index: usize,
    pub tag: StepTag,
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    pub value: Option<f64>,
}

/// Append-only recorder for one algorithm run.
///
/// Also carries the advisory cancellation token: algorithms poll
/// `cancelled()` between steps and terminate early with a `Cancelled`
/// outcome instead of stopping silently.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    steps: Vec<Step>,
    cancel: Option<Arc<AtomicBool>>,
}

impl TraceRecorder {
    /// Begin recording a fresh run.
    pub fn begin_run() -> Self {
        TraceRecorder::default()
    }

    /// Begin recording with an advisory cancellation token.
    pub fn with_cancel_token(cancel: Arc<AtomicBool>) -> Self {
        TraceRecorder {
            steps: Vec::new(),
            cancel: Some(cancel),
        }
    }

    /// Append one step. Prior steps are never mutated; the recorder
    /// assigns the step index.
    pub fn record(
        &mut self,
        tag: StepTag,
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
        value: Option<f64>,
    ) {
        let index = self.steps.len();
        self.steps.push(Step {
            index,
            tag,
            nodes,
            edges,
            value,
        });
    }

    /// Shorthand for a single-node step.
    pub fn record_node(&mut self, tag: StepTag, node: NodeId) {
        self.record(tag, vec![node], Vec::new(), None);
    }

    /// Shorthand for a single-node step with a scalar payload.
    pub fn record_node_value(&mut self, tag: StepTag, node: NodeId, value: f64) {
        self.record(tag, vec![node], Vec::new(), Some(value));
    }

    /// Shorthand for a single-edge step with a scalar payload.
    pub fn record_edge(&mut self, tag: StepTag, edge: EdgeId, value: Option<f64>) {
        self.record(tag, Vec::new(), vec![edge], value);
    }

    /// Number of steps recorded so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Advisory cancellation check, polled by algorithms between steps.
    pub fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Seal the sequence. The resulting trace is immutable.
    pub fn finalize(self) -> Trace {
        Trace {
            steps: Arc::from(self.steps),
        }
    }
}

/// Immutable, finite, restartable step sequence.
///
/// Cloning is cheap (shared backing storage) and iteration may restart
/// from step 0 arbitrarily often without re-running the algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    steps: Arc<[Step]>,
}

impl Trace {
    /// An empty trace, for runs that never started.
    pub fn empty() -> Self {
        Trace {
            steps: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_assigns_indices() {
        let mut recorder = TraceRecorder::begin_run();
        recorder.record_node(StepTag::Visit, 0);
        recorder.record_node(StepTag::Frontier, 1);
        recorder.record_edge(StepTag::Relax, 5, Some(3.0));

        let trace = recorder.finalize();
        assert_eq!(trace.len(), 3);
        for (i, step) in trace.iter().enumerate() {
            assert_eq!(step.index, i);
        }
        assert_eq!(trace.get(2).unwrap().edges, vec![5]);
        assert_eq!(trace.get(2).unwrap().value, Some(3.0));
    }

    #[test]
    fn test_replay_is_idempotent() {
        let mut recorder = TraceRecorder::begin_run();
        recorder.record_node(StepTag::Visit, 0);
        recorder.record_node_value(StepTag::Settle, 1, 2.0);
        let trace = recorder.finalize();

        let first: Vec<Step> = trace.iter().cloned().collect();
        let second: Vec<Step> = trace.iter().cloned().collect();
        assert_eq!(first, second);

        // a clone shares the same sealed sequence
        let cloned = trace.clone();
        let third: Vec<Step> = cloned.iter().cloned().collect();
        assert_eq!(first, third);
    }

    #[test]
    fn test_trace_serializes_to_json() {
        let mut recorder = TraceRecorder::begin_run();
        recorder.record_node(StepTag::Visit, 3);
        recorder.record_edge(StepTag::Relax, 1, Some(2.5));
        let trace = recorder.finalize();

        let json = serde_json::to_value(&trace).unwrap();
        let steps = json["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0]["tag"], "visit");
        assert_eq!(steps[0]["nodes"][0], 3);
        assert_eq!(steps[1]["value"], 2.5);
    }

    #[test]
    fn test_cancel_token() {
        let flag = Arc::new(AtomicBool::new(false));
        let recorder = TraceRecorder::with_cancel_token(flag.clone());
        assert!(!recorder.cancelled());
        flag.store(true, Ordering::Relaxed);
        assert!(recorder.cancelled());

        let recorder = TraceRecorder::begin_run();
        assert!(!recorder.cancelled());
    }
}
