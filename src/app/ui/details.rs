use eframe::egui::{self, RichText, Ui};

use crate::scoring::Tier;
use crate::util::{format_usd, short_name};

use super::super::ViewModel;
use super::super::render_utils::tier_color;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        self.draw_selection(ui);
        ui.separator();
        self.draw_priorities(ui);
    }

    fn draw_selection(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a repository from the graph or the priorities table.");
            return;
        };

        let Some(score) = self.scores.get(&selected_id) else {
            ui.label("Selected repository has no score in the current data.");
            return;
        };

        ui.label(RichText::new(short_name(&score.repo)).strong());
        ui.small(score.repo.as_str());
        ui.add_space(6.0);

        let tier = Tier::classify(score.normalized_score, &self.config.funding.tiers);
        ui.horizontal(|ui| {
            ui.label("Tier:");
            ui.colored_label(tier_color(tier), tier.label());
            ui.label(format!("({})", tier.funding_level()));
        });
        ui.label(format!("Criticality: {:.2}", score.normalized_display()));
        ui.label(format!("Raw score: {:.2}", score.raw_score));
        ui.label(format!(
            "Wins: {} of {} ({:.0}%)",
            score.wins,
            score.total_comparisons,
            score.win_rate * 100.0
        ));
        ui.label(format!("Avg. winning multiplier: {:.2}", score.avg_multiplier));

        if let Some(priority) = self
            .priorities
            .iter()
            .find(|priority| priority.repo == selected_id)
        {
            ui.label(format!(
                "Rank {} · recommended {}",
                priority.rank,
                format_usd(priority.recommended_funding)
            ));
        }

        match self.graph.node(&selected_id) {
            Some(node) => {
                let incoming = self
                    .graph
                    .edges
                    .iter()
                    .filter(|edge| edge.target == selected_id)
                    .count();
                let outgoing = self
                    .graph
                    .edges
                    .iter()
                    .filter(|edge| edge.source == selected_id)
                    .count();
                ui.label(format!(
                    "Graph: {incoming} in, {outgoing} out, importance {:.2}",
                    node.importance
                ));
            }
            None => {
                ui.label("Not in the current graph filter.");
            }
        }

        if ui.button("Clear selection").clicked() {
            self.set_selected(None);
        }
    }

    fn draw_priorities(&mut self, ui: &mut Ui) {
        ui.heading("Funding Priorities");
        ui.small(format!(
            "{} to {} by normalized criticality",
            format_usd(self.config.funding.min_funding.max(0.0) as u64),
            format_usd(self.config.funding.max_funding.max(0.0) as u64)
        ));
        ui.add_space(4.0);

        let row_count = self.priorities.len().min(self.priority_rows_visible);
        let mut should_load_more = false;
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .id_salt("priorities_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, row_count, |ui, row_range| {
                if row_range.end + Self::PRIORITY_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for index in row_range {
                    let Some(priority) = self.priorities.get(index) else {
                        continue;
                    };
                    ui.horizontal(|ui| {
                        ui.monospace(format!("{:>3}", priority.rank));
                        let selected = self.selected.as_deref() == Some(priority.repo.as_str());
                        let name = RichText::new(short_name(&priority.repo));
                        let name = if selected { name.strong() } else { name };
                        if ui.link(name).on_hover_text(priority.repo.as_str()).clicked() {
                            clicked = Some(priority.repo.clone());
                        }
                        ui.colored_label(tier_color(priority.tier), priority.tier.label());
                        ui.label(format!("{:.2}", priority.normalized_score));
                        ui.label(format_usd(priority.recommended_funding));
                    });
                }
            });

        if should_load_more && self.priority_rows_visible < self.priorities.len() {
            self.priority_rows_visible += Self::PRIORITY_PAGE_ROWS;
        }
        if clicked.is_some() {
            self.set_selected(clicked);
        }
    }
}
