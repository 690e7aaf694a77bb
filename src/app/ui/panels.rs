use eframe::egui::{self, Align, Context, Layout};
use tracing::debug;

use crate::config::{AnalysisConfig, GraphConfig};
use crate::graph::build_graph;
use crate::layout::{LayoutSession, Phase};
use crate::scoring::{funding_priorities, score_records};

use super::super::{LoadedRecords, ViewModel};

impl ViewModel {
    pub(in crate::app) const INITIAL_PRIORITY_ROWS: usize = 40;
    pub(in crate::app) const PRIORITY_PAGE_ROWS: usize = 40;
    pub(in crate::app) const PRIORITY_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(loaded: LoadedRecords, config: AnalysisConfig) -> Self {
        let LoadedRecords { records, report } = loaded;
        let scores = score_records(&records);
        let priorities = funding_priorities(&scores, &config.funding);

        // Heaviest pair count bounds the edge-count slider.
        let unfiltered = build_graph(
            &records,
            &GraphConfig {
                min_edge_count: 1,
                largest_component_only: false,
            },
        );
        let max_edge_count = unfiltered
            .edges
            .iter()
            .map(|edge| edge.count)
            .max()
            .unwrap_or(1)
            .max(config.graph.min_edge_count);

        let graph = build_graph(&records, &config.graph);
        let session = LayoutSession::from_graph(&graph, config.layout);

        Self {
            min_edge_count: config.graph.min_edge_count,
            largest_component_only: config.graph.largest_component_only,
            max_edge_count,
            ingest_summary: report.summary(),
            records,
            scores,
            priorities,
            graph,
            session,
            config,
            graph_dirty: false,
            search: String::new(),
            search_match_cache: None,
            selected: None,
            priority_rows_visible: Self::INITIAL_PRIORITY_ROWS,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source_label: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.graph_dirty {
            self.rebuild_graph();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("criticality-graph");
                    ui.separator();
                    ui.label(format!("source: {source_label}"));
                    ui.label(format!("records: {}", self.records.len()));
                    ui.label(format!("repositories: {}", self.scores.len()));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload records"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(phase_text(self.session.phase()));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading comparison records...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    /// Rebuilds the graph from the current filters and restarts the layout.
    pub(in crate::app) fn rebuild_graph(&mut self) {
        let config = GraphConfig {
            min_edge_count: self.min_edge_count.max(1),
            largest_component_only: self.largest_component_only,
        };
        self.graph = build_graph(&self.records, &config);
        self.session.load(&self.graph);
        self.search_match_cache = None;
        self.graph_dirty = false;
        debug!(
            min_edge_count = config.min_edge_count,
            nodes = self.graph.node_count(),
            "rebuilt viewer graph"
        );
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        self.selected = selected;
    }
}

fn phase_text(phase: Phase) -> String {
    match phase {
        Phase::Uninitialized => "layout: idle".to_owned(),
        Phase::Simulating { frame } => format!("layout: simulating (frame {frame})"),
        Phase::Settled { frames } => format!("layout: settled after {frames} frames"),
    }
}
