// One-way GraphML export, for loading a workbench graph into external
// viewers (Gephi, yEd). Import is out of scope; JSON is the round-trip
// format.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::error::Result;
use crate::core::graph::Graph;

/// Write a graph to `path` as GraphML.
///
/// Nodes carry their label and layout position as data keys, edges their
/// weight. Node ids are prefixed `n` and edge ids `e` per convention.
pub fn export_graphml(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n");
    out.push_str("  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>\n");
    out.push_str("  <key id=\"x\" for=\"node\" attr.name=\"x\" attr.type=\"double\"/>\n");
    out.push_str("  <key id=\"y\" for=\"node\" attr.name=\"y\" attr.type=\"double\"/>\n");
    out.push_str("  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"double\"/>\n");

    let edgedefault = if graph.is_directed() {
        "directed"
    } else {
        "undirected"
    };
    let _ = writeln!(out, "  <graph id=\"G\" edgedefault=\"{edgedefault}\">");

    for id in graph.sorted_node_ids() {
        let node = graph.node(id)?;
        let _ = writeln!(out, "    <node id=\"n{}\">", node.id);
        let _ = writeln!(out, "      <data key=\"label\">{}</data>", escape(&node.label));
        let _ = writeln!(out, "      <data key=\"x\">{}</data>", node.x);
        let _ = writeln!(out, "      <data key=\"y\">{}</data>", node.y);
        out.push_str("    </node>\n");
    }

    for edge in graph.edges() {
        let _ = writeln!(
            out,
            "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\">",
            edge.id, edge.source, edge.target
        );
        let _ = writeln!(out, "      <data key=\"weight\">{}</data>", edge.weight);
        out.push_str("    </edge>\n");
    }

    out.push_str("  </graph>\n");
    out.push_str("</graphml>\n");

    fs::write(path, out)?;
    info!(path = %path.display(), "graph exported as GraphML");
    Ok(())
}

/// Minimal XML text escaping for labels.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
