// GraphLab Library
// An educational graph-theory workbench: a mutable graph model, a
// catalog of classic algorithms and a replayable execution trace for
// step-by-step study.

// Common modules
pub mod common {
    pub mod error;
}

// Core model modules
pub mod core {
    pub mod graph;
    pub mod library;
    pub mod trace;
}

// Algorithm catalog
pub mod algorithms;

// Run controller
pub mod runner;

// Persistence
pub mod io;

// Re-export commonly used types for convenience
pub use crate::common::error::{GraphError, Result};
pub use crate::core::graph::{Edge, EdgeId, Graph, Node, NodeId};
pub use crate::core::library::LibraryGraph;
pub use crate::core::trace::{Step, StepTag, Trace, TraceRecorder};

pub use algorithms::{
    AlgorithmCatalog, AlgorithmKind, AlgorithmModule, DistanceEntry, EulerianVerdict, RunOutcome,
    RunParams,
};
pub use runner::{AlgorithmInfo, RunReport, RunRequest, Runner, Workbench};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert!(!NAME.is_empty());
    }
}
