// Persistence boundary: JSON save/load of whole graphs and a one-way
// GraphML export for interchange with external tools.

pub mod graphml;
pub mod json;

pub use graphml::export_graphml;
pub use json::{load_graph, save_graph};
