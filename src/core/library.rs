// Catalog of classic teaching graphs, generated with layout positions
// so the canvas can show them directly.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::common::error::GraphError;
use crate::core::graph::{Graph, NodeId};

/// The built-in teaching graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryGraph {
    /// Simple chain A-B-C-D-E.
    Chain,
    /// Cycle A-B-...-A.
    Cycle,
    /// Star: one center connected to every branch.
    Star,
    /// Complete graph K_n.
    Complete,
    /// Rectangular grid.
    Grid,
    /// The seven bridges of Königsberg (Euler, 1736).
    Konigsberg,
    /// The Petersen graph.
    Petersen,
    /// Weighted diamond with several competing paths, for Dijkstra.
    Weighted,
    /// Three components: a triangle, a chain and an isolated node.
    Disconnected,
    /// A square with a diagonal - one obvious cycle.
    WithCycle,
}

impl LibraryGraph {
    pub const ALL: [LibraryGraph; 10] = [
        LibraryGraph::Chain,
        LibraryGraph::Cycle,
        LibraryGraph::Star,
        LibraryGraph::Complete,
        LibraryGraph::Grid,
        LibraryGraph::Konigsberg,
        LibraryGraph::Petersen,
        LibraryGraph::Weighted,
        LibraryGraph::Disconnected,
        LibraryGraph::WithCycle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryGraph::Chain => "chain",
            LibraryGraph::Cycle => "cycle",
            LibraryGraph::Star => "star",
            LibraryGraph::Complete => "complete",
            LibraryGraph::Grid => "grid",
            LibraryGraph::Konigsberg => "konigsberg",
            LibraryGraph::Petersen => "petersen",
            LibraryGraph::Weighted => "weighted",
            LibraryGraph::Disconnected => "disconnected",
            LibraryGraph::WithCycle => "with-cycle",
        }
    }

    /// Materialize the graph.
    pub fn build(&self) -> Graph {
        match self {
            LibraryGraph::Chain => chain(5),
            LibraryGraph::Cycle => cycle(6),
            LibraryGraph::Star => star(6),
            LibraryGraph::Complete => complete(5),
            LibraryGraph::Grid => grid(3, 3),
            LibraryGraph::Konigsberg => konigsberg(),
            LibraryGraph::Petersen => petersen(),
            LibraryGraph::Weighted => weighted_example(),
            LibraryGraph::Disconnected => disconnected(),
            LibraryGraph::WithCycle => with_cycle(),
        }
    }
}

impl fmt::Display for LibraryGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryGraph {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LibraryGraph::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| {
                GraphError::invalid_parameter("library", format!("unknown library graph '{s}'"))
            })
    }
}

/// Chain of `n` nodes laid out horizontally.
pub fn chain(n: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_node(100.0 + i as f64 * 100.0, 200.0, "");
    }
    for i in 0..n.saturating_sub(1) {
        connect(&mut graph, i as u64, i as u64 + 1, 1.0);
    }
    graph
}

/// Cycle of `n` nodes laid out on a circle, starting at the top.
pub fn cycle(n: usize) -> Graph {
    let mut graph = Graph::new();
    for (x, y) in circle_layout(n, 300.0, 250.0, 150.0) {
        graph.add_node(x, y, "");
    }
    for i in 0..n {
        connect(&mut graph, i as u64, ((i + 1) % n) as u64, 1.0);
    }
    graph
}

/// Star: a center node connected to `n` branches.
pub fn star(n: usize) -> Graph {
    let mut graph = Graph::new();
    let center = graph.add_node(300.0, 250.0, "");
    for (x, y) in circle_layout(n, 300.0, 250.0, 150.0) {
        let branch = graph.add_node(x, y, "");
        connect(&mut graph, center, branch, 1.0);
    }
    graph
}

/// Complete graph K_n on a circle.
pub fn complete(n: usize) -> Graph {
    let mut graph = Graph::new();
    for (x, y) in circle_layout(n, 300.0, 250.0, 150.0) {
        graph.add_node(x, y, "");
    }
    for i in 0..n {
        for j in (i + 1)..n {
            connect(&mut graph, i as u64, j as u64, 1.0);
        }
    }
    graph
}

/// Rectangular grid with horizontal and vertical edges.
pub fn grid(rows: usize, cols: usize) -> Graph {
    let mut graph = Graph::new();
    for r in 0..rows {
        for c in 0..cols {
            graph.add_node(100.0 + c as f64 * 120.0, 100.0 + r as f64 * 120.0, "");
        }
    }
    let id = |r: usize, c: usize| (r * cols + c) as u64;
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                connect(&mut graph, id(r, c), id(r, c + 1), 1.0);
            }
            if r + 1 < rows {
                connect(&mut graph, id(r, c), id(r + 1, c), 1.0);
            }
        }
    }
    graph
}

/// The seven bridges of Königsberg: four land masses, seven bridges,
/// four odd-degree nodes - no Eulerian walk exists.
pub fn konigsberg() -> Graph {
    let mut graph = Graph::new();
    let north = graph.add_node(300.0, 100.0, "North Bank");
    let south = graph.add_node(300.0, 400.0, "South Bank");
    let island = graph.add_node(300.0, 250.0, "Kneiphof");
    let east = graph.add_node(500.0, 250.0, "East Island");

    // the seven bridges, parallel edges included
    connect(&mut graph, north, island, 1.0);
    connect(&mut graph, north, island, 1.0);
    connect(&mut graph, south, island, 1.0);
    connect(&mut graph, south, island, 1.0);
    connect(&mut graph, north, east, 1.0);
    connect(&mut graph, south, east, 1.0);
    connect(&mut graph, island, east, 1.0);
    graph
}

/// The Petersen graph: outer pentagon, inner pentagram, radial spokes.
pub fn petersen() -> Graph {
    let mut graph = Graph::new();
    for (x, y) in circle_layout(5, 300.0, 250.0, 150.0) {
        graph.add_node(x, y, "");
    }
    for (x, y) in circle_layout(5, 300.0, 250.0, 70.0) {
        graph.add_node(x, y, "");
    }
    for i in 0..5u64 {
        connect(&mut graph, i, (i + 1) % 5, 1.0);
        connect(&mut graph, 5 + i, 5 + (i + 2) % 5, 1.0);
        connect(&mut graph, i, 5 + i, 1.0);
    }
    graph
}

/// Weighted diamond with several competing start-to-goal paths; the
/// cheapest one is Start-C-E-Goal with cost 6.
pub fn weighted_example() -> Graph {
    let mut graph = Graph::new();
    let start = graph.add_node(100.0, 250.0, "Start");
    let b = graph.add_node(250.0, 150.0, "B");
    let c = graph.add_node(250.0, 350.0, "C");
    let d = graph.add_node(400.0, 100.0, "D");
    let e = graph.add_node(400.0, 250.0, "E");
    let f = graph.add_node(400.0, 400.0, "F");
    let goal = graph.add_node(550.0, 250.0, "Goal");

    connect(&mut graph, start, b, 4.0);
    connect(&mut graph, start, c, 2.0);
    connect(&mut graph, b, d, 3.0);
    connect(&mut graph, b, e, 5.0);
    connect(&mut graph, c, e, 1.0);
    connect(&mut graph, c, f, 8.0);
    connect(&mut graph, d, goal, 4.0);
    connect(&mut graph, e, goal, 3.0);
    connect(&mut graph, f, goal, 2.0);
    graph
}

/// Three components: a triangle, a two-node chain and an isolated node.
pub fn disconnected() -> Graph {
    let mut graph = Graph::new();
    let a = graph.add_node(100.0, 150.0, "A");
    let b = graph.add_node(200.0, 100.0, "B");
    let c = graph.add_node(200.0, 200.0, "C");
    connect(&mut graph, a, b, 1.0);
    connect(&mut graph, b, c, 1.0);
    connect(&mut graph, c, a, 1.0);

    let d = graph.add_node(350.0, 150.0, "D");
    let e = graph.add_node(450.0, 150.0, "E");
    connect(&mut graph, d, e, 1.0);

    graph.add_node(300.0, 300.0, "F");
    graph
}

/// Square A-B-C-D-A plus the A-C diagonal.
pub fn with_cycle() -> Graph {
    let mut graph = Graph::new();
    let a = graph.add_node(150.0, 150.0, "A");
    let b = graph.add_node(350.0, 150.0, "B");
    let c = graph.add_node(350.0, 350.0, "C");
    let d = graph.add_node(150.0, 350.0, "D");

    connect(&mut graph, a, b, 1.0);
    connect(&mut graph, b, c, 1.0);
    connect(&mut graph, c, d, 1.0);
    connect(&mut graph, d, a, 1.0);
    connect(&mut graph, a, c, 2.0);
    graph
}

/// Add an edge between two nodes the generator itself just created.
fn connect(graph: &mut Graph, source: NodeId, target: NodeId, weight: f64) {
    graph
        .add_edge(source, target, weight)
        .expect("generator endpoints exist");
}

/// `n` positions evenly spaced on a circle, starting at the top.
fn circle_layout(n: usize, cx: f64, cy: f64, radius: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64 - PI / 2.0;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_library_graph_builds() {
        for entry in LibraryGraph::ALL {
            let graph = entry.build();
            assert!(!graph.is_empty(), "{entry} built an empty graph");
        }
    }

    #[test]
    fn test_library_name_round_trip() {
        for entry in LibraryGraph::ALL {
            assert_eq!(entry.as_str().parse::<LibraryGraph>().unwrap(), entry);
        }
        assert!("moebius".parse::<LibraryGraph>().is_err());
    }

    #[test]
    fn test_chain_shape() {
        let g = chain(5);
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_complete_edge_count() {
        let g = complete(5);
        assert_eq!(g.edge_count(), 5 * 4 / 2);
    }

    #[test]
    fn test_konigsberg_has_seven_bridges() {
        let g = konigsberg();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 7);
        // every land mass has odd degree
        for id in g.sorted_node_ids() {
            assert_eq!(g.incident_edges(id).unwrap().len() % 2, 1);
        }
    }

    #[test]
    fn test_petersen_is_cubic() {
        let g = petersen();
        assert_eq!(g.node_count(), 10);
        assert_eq!(g.edge_count(), 15);
        for id in g.sorted_node_ids() {
            assert_eq!(g.incident_edges(id).unwrap().len(), 3);
        }
    }

    #[test]
    fn test_grid_shape() {
        let g = grid(3, 3);
        assert_eq!(g.node_count(), 9);
        assert_eq!(g.edge_count(), 12);
    }
}
