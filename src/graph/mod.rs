mod build;
mod components;

pub use build::{DependencyGraph, GraphEdge, GraphNode, build_graph};
