use thiserror::Error;

use crate::core::graph::NodeId;

/// Error type shared by the graph model, the algorithm modules and the
/// run controller.
///
/// Invalid input is reported to the immediate caller and never retried;
/// an unreachable target is *not* an error (see `RunOutcome::Unreachable`).
#[derive(Error, Debug)]
pub enum GraphError {
    /// Reference to a node or edge that does not exist in the graph.
    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: String },

    /// A run-request parameter failed validation against the target graph.
    /// Raised before execution starts, so a failed run has zero side effects.
    #[error("invalid parameter '{param}': {reason}")]
    InvalidParameter { param: &'static str, reason: String },

    /// A structural precondition of the chosen algorithm is violated,
    /// e.g. a negative edge weight handed to Dijkstra.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Bellman-Ford detected a negative-weight cycle reachable from the
    /// start node; shortest paths are unbounded.
    #[error("negative cycle detected through nodes {cycle:?}")]
    NegativeCycleDetected { cycle: Vec<NodeId> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GraphError {
    pub fn node_not_found(id: NodeId) -> Self {
        GraphError::NotFound {
            what: "node",
            id: id.to_string(),
        }
    }

    pub fn edge_not_found(source: NodeId, target: NodeId) -> Self {
        GraphError::NotFound {
            what: "edge",
            id: format!("{source}->{target}"),
        }
    }

    pub fn invalid_parameter(param: &'static str, reason: impl Into<String>) -> Self {
        GraphError::InvalidParameter {
            param,
            reason: reason.into(),
        }
    }

    pub fn invalid_graph(message: impl Into<String>) -> Self {
        GraphError::InvalidGraph(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GraphError::NotFound { .. })
    }
}

/// Result type alias for workbench operations.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = GraphError::node_not_found(7);
        assert_eq!(err.to_string(), "node 7 not found");
        assert!(err.is_not_found());

        let err = GraphError::edge_not_found(0, 3);
        assert_eq!(err.to_string(), "edge 0->3 not found");
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = GraphError::invalid_parameter("start", "node 9 does not exist");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'start': node 9 does not exist"
        );
        assert!(!err.is_not_found());
    }
}
