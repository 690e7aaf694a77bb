use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::GraphConfig;
use crate::records::ComparisonRecord;
use crate::util::short_name;

use super::components::largest_weak_component;

const BASE_NODE_SIZE: f64 = 10.0;
const NODE_SIZE_RANGE: f64 = 30.0;
const MAX_EDGE_WIDTH: f64 = 5.0;

/// Aggregated `source -> target` edge. Direction is `repo_a -> repo_b`
/// regardless of which side won.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub count: u32,
    pub total_multiplier: f64,
}

impl GraphEdge {
    pub fn avg_multiplier(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_multiplier / f64::from(self.count)
        }
    }

    /// Stroke width hint, capped at 5.
    pub fn width(&self) -> f64 {
        (f64::from(self.count) * 0.5).min(MAX_EDGE_WIDTH)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Incoming edge count normalized to `[0, 1]`.
    pub importance: f64,
    pub size: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(skip)]
    index_by_id: HashMap<String, usize>,
}

impl DependencyGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Default)]
struct EdgeAccumulator {
    multipliers: Vec<f64>,
}

impl EdgeAccumulator {
    /// Sums in sorted order so the total does not depend on record order.
    fn total(&mut self) -> f64 {
        self.multipliers.sort_by(f64::total_cmp);
        self.multipliers.iter().sum()
    }
}

/// Aggregates records into a weighted directed graph, keeping only edges
/// seen at least `min_edge_count` times. Nodes are the endpoints of the
/// surviving edges; isolated repositories are left out.
pub fn build_graph(records: &[ComparisonRecord], config: &GraphConfig) -> DependencyGraph {
    if records.is_empty() {
        warn!("no comparison records to build a graph from");
        return DependencyGraph::default();
    }

    let mut pairs: BTreeMap<(&str, &str), EdgeAccumulator> = BTreeMap::new();
    for record in records {
        if record.repo_a.is_empty() || record.repo_b.is_empty() {
            continue;
        }
        pairs
            .entry((record.repo_a.as_str(), record.repo_b.as_str()))
            .or_default()
            .multipliers
            .push(record.weight());
    }

    let unique_pairs = pairs.len();
    let min_edge_count = config.min_edge_count.max(1);
    let mut edges = pairs
        .into_iter()
        .filter_map(|((source, target), mut accumulator)| {
            let count = u32::try_from(accumulator.multipliers.len()).unwrap_or(u32::MAX);
            (count >= min_edge_count).then(|| GraphEdge {
                source: source.to_owned(),
                target: target.to_owned(),
                count,
                total_multiplier: accumulator.total(),
            })
        })
        .collect::<Vec<_>>();

    if config.largest_component_only {
        let keep = largest_weak_component(&edges);
        edges.retain(|edge| keep.contains(edge.source.as_str()));
    }

    let graph = assemble(edges);
    debug!(
        unique_pairs,
        min_edge_count,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built dependency graph"
    );
    graph
}

fn assemble(edges: Vec<GraphEdge>) -> DependencyGraph {
    let ids = edges
        .iter()
        .flat_map(|edge| [edge.source.as_str(), edge.target.as_str()])
        .collect::<BTreeSet<_>>();

    let mut incoming: HashMap<&str, u64> = HashMap::with_capacity(ids.len());
    for edge in &edges {
        *incoming.entry(edge.target.as_str()).or_default() += u64::from(edge.count);
    }
    let max_incoming = incoming.values().copied().max().unwrap_or(0).max(1);

    let nodes = ids
        .iter()
        .map(|&id| {
            let weight = incoming.get(id).copied().unwrap_or(0);
            let importance = weight as f64 / max_incoming as f64;
            GraphNode {
                id: id.to_owned(),
                label: short_name(id).to_owned(),
                importance,
                size: BASE_NODE_SIZE + importance * NODE_SIZE_RANGE,
            }
        })
        .collect::<Vec<_>>();

    let index_by_id = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.clone(), index))
        .collect();

    DependencyGraph {
        nodes,
        edges,
        index_by_id,
    }
}
