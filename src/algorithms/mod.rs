pub mod connectivity;
pub mod cycles;
pub mod eulerian;
pub mod shortest_path;
pub mod traversal;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::{GraphError, Result};
use crate::core::graph::{Graph, NodeId};
use crate::core::trace::TraceRecorder;

pub use connectivity::ConnectedComponentsModule;
pub use cycles::CycleDetectionModule;
pub use eulerian::{EulerianModule, EulerianVerdict};
pub use shortest_path::{BellmanFordModule, DijkstraModule};
pub use traversal::{BfsModule, DfsModule};

/// Identifier of a registered algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    Dfs,
    Bfs,
    Dijkstra,
    BellmanFord,
    ConnectedComponents,
    CycleDetection,
    Eulerian,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 7] = [
        AlgorithmKind::Dfs,
        AlgorithmKind::Bfs,
        AlgorithmKind::Dijkstra,
        AlgorithmKind::BellmanFord,
        AlgorithmKind::ConnectedComponents,
        AlgorithmKind::CycleDetection,
        AlgorithmKind::Eulerian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::Dfs => "dfs",
            AlgorithmKind::Bfs => "bfs",
            AlgorithmKind::Dijkstra => "dijkstra",
            AlgorithmKind::BellmanFord => "bellman-ford",
            AlgorithmKind::ConnectedComponents => "connected-components",
            AlgorithmKind::CycleDetection => "cycle-detection",
            AlgorithmKind::Eulerian => "eulerian",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dfs" => Ok(AlgorithmKind::Dfs),
            "bfs" => Ok(AlgorithmKind::Bfs),
            "dijkstra" => Ok(AlgorithmKind::Dijkstra),
            "bellman-ford" => Ok(AlgorithmKind::BellmanFord),
            "connected-components" => Ok(AlgorithmKind::ConnectedComponents),
            "cycle-detection" => Ok(AlgorithmKind::CycleDetection),
            "eulerian" => Ok(AlgorithmKind::Eulerian),
            other => Err(GraphError::invalid_parameter(
                "algorithm",
                format!("unknown algorithm '{other}'"),
            )),
        }
    }
}

/// Algorithm-specific run parameters, validated against the target graph
/// before execution begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    /// Start node for traversals and shortest-path runs.
    pub start: Option<NodeId>,
    /// Optional end node; shortest-path runs reconstruct the path to it.
    pub end: Option<NodeId>,
}

impl RunParams {
    pub fn from_start(start: NodeId) -> Self {
        RunParams {
            start: Some(start),
            end: None,
        }
    }

    pub fn between(start: NodeId, end: NodeId) -> Self {
        RunParams {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Resolve the start node: an explicit one must exist in the graph,
    /// a missing one defaults to the lowest node id.
    pub(crate) fn resolve_start(&self, graph: &Graph) -> Result<NodeId> {
        match self.start {
            Some(start) => {
                if graph.node(start).is_err() {
                    return Err(GraphError::invalid_parameter(
                        "start",
                        format!("node {start} does not exist in the graph"),
                    ));
                }
                Ok(start)
            }
            None => graph
                .sorted_node_ids()
                .first()
                .copied()
                .ok_or_else(|| GraphError::invalid_parameter("start", "graph is empty")),
        }
    }

    /// Validate the optional end node against the graph.
    pub(crate) fn resolve_end(&self, graph: &Graph) -> Result<Option<NodeId>> {
        match self.end {
            Some(end) => {
                if graph.node(end).is_err() {
                    return Err(GraphError::invalid_parameter(
                        "end",
                        format!("node {end} does not exist in the graph"),
                    ));
                }
                Ok(Some(end))
            }
            None => Ok(None),
        }
    }
}

/// Entry of a single-source distance table: node, distance (`None` when
/// unreachable) and predecessor on a shortest path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub node: NodeId,
    pub distance: Option<f64>,
    pub predecessor: Option<NodeId>,
}

/// Terminal summary of an algorithm run.
///
/// `Unreachable` and `Cancelled` are valid terminals, not errors; the
/// `Display` form is the textual result the UI boundary shows verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Visitation order of a traversal.
    Traversal { start: NodeId, order: Vec<NodeId> },
    /// Shortest path between two nodes and its total cost.
    ShortestPath {
        path: Vec<NodeId>,
        cost: f64,
    },
    /// No path exists between the two nodes.
    Unreachable { from: NodeId, to: NodeId },
    /// Single-source distance table (no end node requested).
    Distances {
        start: NodeId,
        entries: Vec<DistanceEntry>,
    },
    /// Connected components, each a sorted list of node ids.
    Components { components: Vec<Vec<NodeId>> },
    /// Detected cycles, each closed (first id repeated last).
    Cycles { cycles: Vec<Vec<NodeId>> },
    /// Eulerian circuit/path verdict, with the walk when one exists.
    Eulerian { verdict: EulerianVerdict },
    /// The run observed its cancellation token and stopped early.
    Cancelled,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Traversal { start, order } => {
                let order_str: Vec<String> = order.iter().map(|n| n.to_string()).collect();
                write!(
                    f,
                    "traversal from {start}: {} ({} nodes visited)",
                    order_str.join(" -> "),
                    order.len()
                )
            }
            RunOutcome::ShortestPath { path, cost } => {
                let path_str: Vec<String> = path.iter().map(|n| n.to_string()).collect();
                write!(f, "path {} with total cost {cost}", path_str.join(" -> "))
            }
            RunOutcome::Unreachable { from, to } => {
                write!(f, "no path from {from} to {to}")
            }
            RunOutcome::Distances { start, entries } => {
                writeln!(f, "distances from {start}:")?;
                for entry in entries {
                    match entry.distance {
                        Some(d) => write!(f, "  {} : {d}", entry.node)?,
                        None => write!(f, "  {} : unreachable", entry.node)?,
                    }
                    if let Some(prev) = entry.predecessor {
                        write!(f, " (via {prev})")?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            RunOutcome::Components { components } => {
                writeln!(f, "{} connected component(s):", components.len())?;
                for (i, component) in components.iter().enumerate() {
                    let ids: Vec<String> = component.iter().map(|n| n.to_string()).collect();
                    writeln!(f, "  component {}: {}", i + 1, ids.join(", "))?;
                }
                Ok(())
            }
            RunOutcome::Cycles { cycles } => {
                if cycles.is_empty() {
                    return write!(f, "no cycle found");
                }
                writeln!(f, "{} cycle(s) found:", cycles.len())?;
                for cycle in cycles {
                    let ids: Vec<String> = cycle.iter().map(|n| n.to_string()).collect();
                    writeln!(f, "  {}", ids.join(" -> "))?;
                }
                Ok(())
            }
            RunOutcome::Eulerian { verdict } => write!(f, "{verdict}"),
            RunOutcome::Cancelled => write!(f, "run cancelled"),
        }
    }
}

/// Uniform contract every algorithm implementation satisfies, so the run
/// controller and the UI can treat all algorithms identically.
pub trait AlgorithmModule: Send + Sync {
    /// The identifier this module is registered under.
    fn kind(&self) -> AlgorithmKind;

    /// Static pedagogical explanation of the algorithm.
    fn describe(&self) -> &'static str;

    /// Declared asymptotic time/space bounds (metadata, not computed).
    fn complexity(&self) -> &'static str;

    /// Check parameters and structural preconditions against the graph.
    /// Must fail before any trace step is recorded, so a rejected run
    /// produces zero steps.
    fn validate(&self, graph: &Graph, params: &RunParams) -> Result<()>;

    /// Execute synchronously to completion, emitting steps to the
    /// recorder as a side effect.
    fn run(
        &self,
        graph: &Graph,
        params: &RunParams,
        recorder: &mut TraceRecorder,
    ) -> Result<RunOutcome>;
}

/// Explicit algorithm registry, built as data at startup - no
/// module-level mutable state. The run controller dispatches through it
/// without conditional branching on algorithm type.
pub struct AlgorithmCatalog {
    modules: HashMap<AlgorithmKind, Box<dyn AlgorithmModule>>,
}

impl AlgorithmCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        AlgorithmCatalog {
            modules: HashMap::new(),
        }
    }

    /// The standard classroom catalog with every built-in algorithm.
    pub fn standard() -> Self {
        let mut catalog = AlgorithmCatalog::new();
        catalog.register(Box::new(DfsModule));
        catalog.register(Box::new(BfsModule));
        catalog.register(Box::new(DijkstraModule));
        catalog.register(Box::new(BellmanFordModule));
        catalog.register(Box::new(ConnectedComponentsModule));
        catalog.register(Box::new(CycleDetectionModule));
        catalog.register(Box::new(EulerianModule));
        catalog
    }

    /// Register a module under its own kind, replacing any previous one.
    pub fn register(&mut self, module: Box<dyn AlgorithmModule>) {
        self.modules.insert(module.kind(), module);
    }

    /// Look up a module by kind.
    pub fn get(&self, kind: AlgorithmKind) -> Result<&dyn AlgorithmModule> {
        self.modules
            .get(&kind)
            .map(|module| module.as_ref())
            .ok_or_else(|| {
                GraphError::invalid_parameter(
                    "algorithm",
                    format!("algorithm '{kind}' is not registered"),
                )
            })
    }

    /// Registered kinds in declaration order of `AlgorithmKind::ALL`.
    pub fn kinds(&self) -> Vec<AlgorithmKind> {
        AlgorithmKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.modules.contains_key(kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for AlgorithmCatalog {
    fn default() -> Self {
        AlgorithmCatalog::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(kind.as_str().parse::<AlgorithmKind>().unwrap(), kind);
        }
        assert!("floyd-warshall".parse::<AlgorithmKind>().is_err());
    }

    #[test]
    fn test_standard_catalog_is_complete() {
        let catalog = AlgorithmCatalog::standard();
        assert_eq!(catalog.len(), AlgorithmKind::ALL.len());
        for kind in AlgorithmKind::ALL {
            let module = catalog.get(kind).unwrap();
            assert_eq!(module.kind(), kind);
            assert!(!module.describe().is_empty());
            assert!(!module.complexity().is_empty());
        }
    }

    #[test]
    fn test_empty_catalog_rejects_lookup() {
        let catalog = AlgorithmCatalog::new();
        let err = catalog
            .get(AlgorithmKind::Dfs)
            .err()
            .expect("lookup in an empty catalog must fail");
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn test_resolve_start_defaults_to_lowest_id() {
        let mut graph = Graph::new();
        let a = graph.add_node(0.0, 0.0, "");
        graph.add_node(1.0, 0.0, "");
        let params = RunParams::default();
        assert_eq!(params.resolve_start(&graph).unwrap(), a);
    }

    #[test]
    fn test_resolve_start_rejects_unknown_node() {
        let mut graph = Graph::new();
        graph.add_node(0.0, 0.0, "");
        let params = RunParams::from_start(42);
        let err = params.resolve_start(&graph).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidParameter { param: "start", .. }
        ));
    }

    #[test]
    fn test_resolve_start_empty_graph() {
        let graph = Graph::new();
        let params = RunParams::default();
        assert!(params.resolve_start(&graph).is_err());
    }
}
