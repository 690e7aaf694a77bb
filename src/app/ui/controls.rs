use eframe::egui::{self, RichText, Ui};

use crate::scoring::Tier;
use crate::util::short_name;

use super::super::ViewModel;
use super::super::render_utils::tier_color;

const SEARCH_RESULT_ROWS: usize = 12;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        let edge_slider = ui
            .add(
                egui::Slider::new(&mut self.min_edge_count, 1..=self.max_edge_count)
                    .text("min edge count"),
            )
            .on_hover_text("Keep only repository pairs compared at least this many times.");
        if edge_slider.changed() {
            self.graph_dirty = true;
        }

        let component_toggle = ui
            .checkbox(&mut self.largest_component_only, "Largest component only")
            .on_hover_text("Hide repositories outside the biggest connected cluster.");
        if component_toggle.changed() {
            self.graph_dirty = true;
        }

        ui.separator();

        ui.label("Search repositories")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the rendered graph.");
        ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("owner/name"));

        let results = self.search_results(SEARCH_RESULT_ROWS);
        let mut clicked = None;
        for repo in &results {
            if ui.link(short_name(repo)).on_hover_text(repo.as_str()).clicked() {
                clicked = Some(repo.clone());
            }
        }
        if clicked.is_some() {
            self.set_selected(clicked);
        }

        ui.separator();

        let (rotation_x, rotation_y) = self.session.rotation();
        ui.label(format!("rotation: x {rotation_x:.2}  y {rotation_y:.2}"));
        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked() {
                self.session.reset_view();
            }
            if ui.button("Restart layout").clicked() {
                self.session.load(&self.graph);
                self.search_match_cache = None;
            }
        });
        ui.small("Drag a node to pin it. Drag empty space to rotate.");

        ui.separator();
        ui.label(RichText::new("Data").strong());
        ui.label(self.ingest_summary.as_str());

        for tier in Tier::ALL {
            let count = self
                .priorities
                .iter()
                .filter(|priority| priority.tier == tier)
                .count();
            ui.horizontal(|ui| {
                ui.colored_label(tier_color(tier), tier.label());
                ui.label(format!("{count}"));
            });
        }
    }
}
