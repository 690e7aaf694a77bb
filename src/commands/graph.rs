use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use criticality_graph::config::AnalysisConfig;
use criticality_graph::export::{graph_json, write_text};
use criticality_graph::graph::build_graph;
use criticality_graph::layout::LayoutSession;

const PRINTED_EDGES: usize = 15;

pub fn run(config: &AnalysisConfig, input: &Path, output: Option<PathBuf>) -> Result<()> {
    let Some(store) = super::load_records(config, input)? else {
        return Ok(());
    };

    let graph = build_graph(store.records(), &config.graph);
    println!(
        "{} nodes, {} edges (min edge count {})",
        graph.node_count(),
        graph.edge_count(),
        config.graph.min_edge_count
    );

    let mut heaviest = graph.edges.iter().collect::<Vec<_>>();
    heaviest.sort_by(|a, b| b.count.cmp(&a.count));
    for edge in heaviest.iter().take(PRINTED_EDGES) {
        println!(
            "  {} -> {}  x{}  avg multiplier {:.2}",
            edge.source,
            edge.target,
            edge.count,
            edge.avg_multiplier()
        );
    }

    if let Some(path) = output {
        let mut session = LayoutSession::from_graph(&graph, config.layout);
        let frames = session.settle();
        info!(frames, "layout settled");

        let contents = graph_json(&graph, &session).context("failed to encode graph")?;
        write_text(&path, &contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote graph layout");
    }

    Ok(())
}
