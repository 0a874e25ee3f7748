// JSON graph documents.
//
// The on-disk document carries the id counter alongside the node and
// edge lists so a loaded graph keeps handing out fresh ids, never
// reviving a deleted one.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::error::Result;
use crate::core::graph::{Graph, Node, NodeId};

/// The serialized shape of a graph document.
#[derive(Debug, Serialize, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    directed: bool,
    /// Next node id the graph would hand out.
    #[serde(default)]
    next_id: NodeId,
    nodes: Vec<Node>,
    edges: Vec<EdgeRecord>,
}

/// Edges are stored by endpoint; edge ids are reassigned on load.
#[derive(Debug, Serialize, Deserialize)]
struct EdgeRecord {
    source: NodeId,
    target: NodeId,
    weight: f64,
}

/// Save a graph to a pretty-printed JSON file.
pub fn save_graph(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut nodes: Vec<Node> = graph.nodes().cloned().collect();
    nodes.sort_by_key(|n| n.id);

    let document = GraphDocument {
        directed: graph.is_directed(),
        next_id: graph.next_node_id(),
        nodes,
        edges: graph
            .edges()
            .iter()
            .map(|e| EdgeRecord {
                source: e.source,
                target: e.target,
                weight: e.weight,
            })
            .collect(),
    };

    fs::write(path, serde_json::to_string_pretty(&document)?)?;
    info!(path = %path.display(), nodes = document.nodes.len(), "graph saved");
    Ok(())
}

/// Load a graph from a JSON file written by `save_graph`.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph> {
    let path = path.as_ref();
    let document: GraphDocument = serde_json::from_str(&fs::read_to_string(path)?)?;

    let mut graph = Graph::with_directed(document.directed);
    for node in document.nodes {
        graph.restore_node(node);
    }
    graph.reserve_node_ids(document.next_id);
    for edge in document.edges {
        graph.add_edge(edge.source, edge.target, edge.weight)?;
    }

    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_round_trip() {
        let mut g = Graph::with_directed(true);
        let a = g.add_node(10.0, 20.0, "Start");
        let b = g.add_node(30.0, 40.0, "");
        g.add_edge(a, b, 2.5).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        save_graph(&g, &path).unwrap();

        let loaded = load_graph(&path).unwrap();
        assert!(loaded.is_directed());
        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.edge_count(), 1);
        assert_eq!(loaded.node(a).unwrap().label, "Start");
        assert_eq!(loaded.node(b).unwrap().label, "B");
        assert_eq!(loaded.edge_weight(a, b).unwrap(), 2.5);
        assert_eq!(loaded.node(a).unwrap().x, 10.0);
    }

    #[test]
    fn test_loaded_graph_keeps_ids_fresh() {
        let mut g = Graph::new();
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(0.0, 0.0, "");
        g.remove_node(a).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        save_graph(&g, &path).unwrap();

        let mut loaded = load_graph(&path).unwrap();
        let fresh = loaded.add_node(0.0, 0.0, "");
        assert!(fresh > b);
    }

    #[test]
    fn test_deleted_max_id_stays_retired_after_round_trip() {
        // Deleting the highest-id node must not let a round-trip revive
        // its id: the saved counter is the graph's, not max + 1.
        let mut g = Graph::new();
        let a = g.add_node(0.0, 0.0, "");
        let b = g.add_node(0.0, 0.0, "");
        g.remove_node(b).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        save_graph(&g, &path).unwrap();

        let mut loaded = load_graph(&path).unwrap();
        assert_eq!(loaded.next_node_id(), g.next_node_id());
        let fresh = loaded.add_node(0.0, 0.0, "");
        assert_ne!(fresh, b);
        assert!(fresh > b);
        assert!(loaded.node(a).is_ok());
    }

    #[test]
    fn test_load_rejects_dangling_edge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"directed":false,"next_id":1,
                "nodes":[{"id":0,"x":0.0,"y":0.0,"label":"A"}],
                "edges":[{"source":0,"target":9,"weight":1.0}]}"#,
        )
        .unwrap();
        assert!(load_graph(&path).unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_graph(&path).unwrap_err(),
            crate::common::error::GraphError::Serde(_)
        ));
    }
}
