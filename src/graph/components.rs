use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;

use super::build::GraphEdge;

/// Node ids of the largest weakly connected component. On a size tie the
/// component holding the lexicographically smallest id wins.
pub(super) fn largest_weak_component(edges: &[GraphEdge]) -> HashSet<String> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut index_by_id: BTreeMap<&str, NodeIndex> = BTreeMap::new();
    for edge in edges {
        let source = *index_by_id
            .entry(edge.source.as_str())
            .or_insert_with(|| graph.add_node(edge.source.as_str()));
        let target = *index_by_id
            .entry(edge.target.as_str())
            .or_insert_with(|| graph.add_node(edge.target.as_str()));
        graph.add_edge(source, target, ());
    }

    let mut components = UnionFind::<usize>::new(graph.node_count());
    for edge in graph.raw_edges() {
        components.union(edge.source().index(), edge.target().index());
    }
    let labels = components.into_labeling();

    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for &label in &labels {
        *sizes.entry(label).or_default() += 1;
    }

    // BTreeMap iteration is sorted by id, so the first label to reach the
    // best size also holds the smallest id.
    let mut best = None;
    let mut best_size = 0;
    for index in index_by_id.values() {
        let label = labels[index.index()];
        let size = sizes.get(&label).copied().unwrap_or(0);
        if size > best_size {
            best_size = size;
            best = Some(label);
        }
    }

    let Some(best) = best else {
        return HashSet::new();
    };

    index_by_id
        .iter()
        .filter(|&(_, index)| labels[index.index()] == best)
        .map(|(&id, _)| id.to_owned())
        .collect()
}
