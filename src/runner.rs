// Run controller - orchestrates a single algorithm invocation:
// validate the request, open a fresh trace, run the module, seal the
// trace and package the result. The controller owns the (Result, Trace)
// pair it returns; the graph model retains nothing.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::algorithms::{AlgorithmCatalog, AlgorithmKind, RunOutcome, RunParams};
use crate::common::error::Result;
use crate::core::graph::Graph;
use crate::core::trace::{Trace, TraceRecorder};

/// A request to run one algorithm against a graph.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub algorithm: Option<AlgorithmKind>,
    pub params: RunParams,
    /// Advisory cancellation token, polled by the algorithm between
    /// steps. `None` means the run cannot be cancelled.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RunRequest {
    pub fn new(algorithm: AlgorithmKind, params: RunParams) -> Self {
        RunRequest {
            algorithm: Some(algorithm),
            params,
            cancel: None,
        }
    }

    pub fn with_cancel_token(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Everything a run produces: the terminal outcome, the sealed trace and
/// run metadata for display.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub algorithm: AlgorithmKind,
    pub outcome: RunOutcome,
    pub trace: Trace,
    pub started: DateTime<Utc>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

mod duration_millis {
    use super::Duration;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64() * 1000.0)
    }
}

/// Static metadata about one registered algorithm, for the UI boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmInfo {
    pub kind: AlgorithmKind,
    pub description: String,
    pub complexity: String,
}

/// Dispatches run requests against the algorithm catalog.
pub struct Runner {
    catalog: AlgorithmCatalog,
}

impl Runner {
    /// Runner over the standard catalog.
    pub fn new() -> Self {
        Runner {
            catalog: AlgorithmCatalog::standard(),
        }
    }

    pub fn with_catalog(catalog: AlgorithmCatalog) -> Self {
        Runner { catalog }
    }

    pub fn catalog(&self) -> &AlgorithmCatalog {
        &self.catalog
    }

    /// Execute one run against a graph snapshot.
    ///
    /// Validation failures return immediately without invoking the
    /// algorithm, so a rejected run records zero steps. The graph must
    /// not be mutated for the duration of the call (see `Workbench`).
    pub fn execute(&self, graph: &Graph, request: &RunRequest) -> Result<RunReport> {
        let kind = request.algorithm.ok_or_else(|| {
            crate::common::error::GraphError::invalid_parameter("algorithm", "no algorithm selected")
        })?;
        let module = self.catalog.get(kind)?;

        module.validate(graph, &request.params)?;

        let started = Utc::now();
        let clock = Instant::now();
        let mut recorder = match &request.cancel {
            Some(token) => TraceRecorder::with_cancel_token(token.clone()),
            None => TraceRecorder::begin_run(),
        };

        debug!(algorithm = %kind, "request validated, executing");
        let outcome = module.run(graph, &request.params, &mut recorder)?;
        let trace = recorder.finalize();
        let elapsed = clock.elapsed();
        info!(
            algorithm = %kind,
            steps = trace.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "run finished"
        );

        Ok(RunReport {
            algorithm: kind,
            outcome,
            trace,
            started,
            elapsed,
        })
    }

    /// Static metadata for one algorithm.
    pub fn info(&self, kind: AlgorithmKind) -> Result<AlgorithmInfo> {
        let module = self.catalog.get(kind)?;
        Ok(AlgorithmInfo {
            kind,
            description: module.describe().to_string(),
            complexity: module.complexity().to_string(),
        })
    }
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new()
    }
}

/// Owns a graph and a runner behind a single-writer discipline: edits
/// take the write lock, runs hold the read lock for their whole
/// duration, so the graph cannot change under a running algorithm.
pub struct Workbench {
    graph: RwLock<Graph>,
    runner: Runner,
}

impl Workbench {
    pub fn new(graph: Graph) -> Self {
        Workbench {
            graph: RwLock::new(graph),
            runner: Runner::new(),
        }
    }

    pub fn with_runner(graph: Graph, runner: Runner) -> Self {
        Workbench {
            graph: RwLock::new(graph),
            runner,
        }
    }

    /// Read access to the graph.
    pub fn graph(&self) -> RwLockReadGuard<'_, Graph> {
        self.graph.read()
    }

    /// Exclusive mutable access for edits; blocked while a run holds the
    /// read lock.
    pub fn edit(&self) -> RwLockWriteGuard<'_, Graph> {
        self.graph.write()
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Execute a run while holding the read lock, guaranteeing the graph
    /// snapshot stays consistent for the run's duration.
    pub fn run(&self, request: &RunRequest) -> Result<RunReport> {
        let graph = self.graph.read();
        self.runner.execute(&graph, request)
    }
}
