// Graph model - the shared substrate every algorithm reads.
//
// Nodes live in a map keyed by a stable, never-reused id; edges live in a
// Vec whose insertion order is the deterministic tie-break every algorithm
// relies on. Mutations are synchronous and immediately consistent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::common::error::{GraphError, Result};

/// Stable node identifier, unique within a graph instance.
pub type NodeId = u64;

/// Stable edge identifier, unique within a graph instance.
pub type EdgeId = u64;

/// A vertex of the graph.
///
/// The position is for layout only and carries no algorithmic meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub label: String,
}

impl Node {
    /// Create a node. An empty label is replaced by a default alphabetic
    /// label derived from the id: 0 -> A, 1 -> B, ..., 26 -> AA.
    pub fn new(id: NodeId, x: f64, y: f64, label: impl Into<String>) -> Self {
        let label = label.into();
        let label = if label.is_empty() {
            default_label(id)
        } else {
            label
        };
        Node { id, x, y, label }
    }
}

/// Spreadsheet-style label for a node id: 0 -> A, 25 -> Z, 26 -> AA.
pub fn default_label(id: NodeId) -> String {
    let mut n = id + 1;
    let mut result = String::new();
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

/// A weighted edge between two nodes.
///
/// Directedness is inherited from the owning graph. Self-loops and
/// parallel edges are permitted; algorithms that reject them say so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

impl Edge {
    /// Given one endpoint, return the other. `None` if `id` is not an
    /// endpoint of this edge.
    pub fn other_endpoint(&self, id: NodeId) -> Option<NodeId> {
        if self.source == id {
            Some(self.target)
        } else if self.target == id {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Mutable labeled graph: node set, edge list and a directedness flag.
///
/// Node ids come from a monotonically increasing counter and are never
/// reused, so they stay stable for the graph's lifetime even across
/// deletions. Accessors taking a node id fail with `NotFound` for an
/// unknown id, so callers can distinguish "no neighbors" from "invalid
/// reference".
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
    directed: bool,
    next_node_id: NodeId,
    next_edge_id: EdgeId,
}

impl Graph {
    /// Create an empty undirected graph.
    pub fn new() -> Self {
        Graph::with_directed(false)
    }

    /// Create an empty graph with the given directedness.
    pub fn with_directed(directed: bool) -> Self {
        Graph {
            nodes: HashMap::new(),
            edges: Vec::new(),
            directed,
            next_node_id: 0,
            next_edge_id: 0,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node at the given position and return its id.
    /// An empty label gets a default alphabetic label (0 -> A, 26 -> AA).
    pub fn add_node(&mut self, x: f64, y: f64, label: impl Into<String>) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.nodes.insert(id, Node::new(id, x, y, label));
        id
    }

    /// Add an edge between two existing nodes and return its id.
    /// Fails with `NotFound` if either endpoint is absent.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> Result<EdgeId> {
        if !self.nodes.contains_key(&source) {
            return Err(GraphError::node_not_found(source));
        }
        if !self.nodes.contains_key(&target) {
            return Err(GraphError::node_not_found(target));
        }
        let id = self.next_edge_id;
        self.next_edge_id += 1;
        self.edges.push(Edge {
            id,
            source,
            target,
            weight,
        });
        Ok(id)
    }

    /// Remove a node and cascade to all incident edges, so no dangling
    /// edge references remain. Returns the removed node.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        let node = self
            .nodes
            .remove(&id)
            .ok_or_else(|| GraphError::node_not_found(id))?;
        self.edges.retain(|e| e.source != id && e.target != id);
        Ok(node)
    }

    /// Remove the first edge between `source` and `target`. Undirected
    /// graphs match either orientation.
    pub fn remove_edge(&mut self, source: NodeId, target: NodeId) -> Result<()> {
        let position = self
            .edges
            .iter()
            .position(|e| self.edge_matches(e, source, target))
            .ok_or_else(|| GraphError::edge_not_found(source, target))?;
        self.edges.remove(position);
        Ok(())
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| GraphError::node_not_found(id))
    }

    /// Display label for a node, falling back to the numeric id when the
    /// node is gone (trace replay may outlive a deletion).
    pub fn label(&self, id: NodeId) -> String {
        self.nodes
            .get(&id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Iterate all nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node ids sorted ascending - the deterministic whole-graph
    /// iteration order used by algorithms that touch every node.
    pub fn sorted_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get an edge by its id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Directly reachable neighbor ids, in edge insertion order.
    /// Directed graphs follow outgoing edges only. Fails with `NotFound`
    /// for an unknown node id.
    pub fn neighbors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::node_not_found(id));
        }
        let mut neighbors = Vec::new();
        for edge in &self.edges {
            if edge.source == id {
                neighbors.push(edge.target);
            } else if !self.directed && edge.target == id {
                neighbors.push(edge.source);
            }
        }
        Ok(neighbors)
    }

    /// All edges incident to a node (either endpoint, regardless of
    /// direction), in insertion order.
    pub fn incident_edges(&self, id: NodeId) -> Result<Vec<&Edge>> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::node_not_found(id));
        }
        Ok(self
            .edges
            .iter()
            .filter(|e| e.source == id || e.target == id)
            .collect())
    }

    /// Outgoing edges of a node as `(edge, neighbor)` pairs in insertion
    /// order; for undirected graphs an edge is outgoing from both ends.
    pub fn outgoing_edges(&self, id: NodeId) -> Result<Vec<(&Edge, NodeId)>> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::node_not_found(id));
        }
        let mut out = Vec::new();
        for edge in &self.edges {
            if edge.source == id {
                out.push((edge, edge.target));
            } else if !self.directed && edge.target == id {
                out.push((edge, edge.source));
            }
        }
        Ok(out)
    }

    /// Whether any edge connects `source` to `target`.
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edges
            .iter()
            .any(|e| self.edge_matches(e, source, target))
    }

    /// First edge between two nodes, if any.
    pub fn edge_between(&self, source: NodeId, target: NodeId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| self.edge_matches(e, source, target))
    }

    /// Weight of the first edge between two nodes. Fails with `NotFound`
    /// if no such edge exists.
    pub fn edge_weight(&self, source: NodeId, target: NodeId) -> Result<f64> {
        self.edge_between(source, target)
            .map(|e| e.weight)
            .ok_or_else(|| GraphError::edge_not_found(source, target))
    }

    /// Smallest edge weight in the graph, if any edges exist.
    pub fn min_edge_weight(&self) -> Option<f64> {
        self.edges
            .iter()
            .map(|e| e.weight)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Update a node's display label.
    pub fn update_node_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| GraphError::node_not_found(id))?;
        node.label = label.into();
        Ok(())
    }

    /// Move a node to a new layout position.
    pub fn set_node_position(&mut self, id: NodeId, x: f64, y: f64) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| GraphError::node_not_found(id))?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    /// Update the weight of the first edge between two nodes.
    pub fn update_edge_weight(&mut self, source: NodeId, target: NodeId, weight: f64) -> Result<()> {
        let directed = self.directed;
        let edge = self
            .edges
            .iter_mut()
            .find(|e| {
                (e.source == source && e.target == target)
                    || (!directed && e.source == target && e.target == source)
            })
            .ok_or_else(|| GraphError::edge_not_found(source, target))?;
        edge.weight = weight;
        Ok(())
    }

    /// Remove every node and edge and reset the id counters.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.next_node_id = 0;
        self.next_edge_id = 0;
    }

    /// Restore a node with an explicit id, used by the load boundary to
    /// rebuild a saved graph. Keeps the id counter ahead of every
    /// restored id.
    pub fn restore_node(&mut self, node: Node) {
        self.next_node_id = self.next_node_id.max(node.id + 1);
        self.nodes.insert(node.id, node);
    }

    /// Advance the node id counter, used by the load boundary so ids
    /// handed out after a load do not collide with deleted ones.
    pub fn reserve_node_ids(&mut self, next_id: NodeId) {
        self.next_node_id = self.next_node_id.max(next_id);
    }

    /// The id the next `add_node` call would assign. Persisted by the
    /// save boundary so deleted ids stay retired across a round-trip.
    pub fn next_node_id(&self) -> NodeId {
        self.next_node_id
    }

    fn edge_matches(&self, edge: &Edge, source: NodeId, target: NodeId) -> bool {
        if edge.source == source && edge.target == target {
            return true;
        }
        !self.directed && edge.source == target && edge.target == source
    }
}
