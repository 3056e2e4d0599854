pub mod graph;
pub mod sui;
