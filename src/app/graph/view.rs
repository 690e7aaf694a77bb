use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, importance_color,
};
use super::super::{SearchMatchCache, ViewModel};

const EDGE_COLOR: Color32 = Color32::from_rgb(128, 150, 176);
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(255, 214, 102);
const SEARCH_COLOR: Color32 = Color32::from_rgb(120, 230, 200);
const LABEL_MIN_RADIUS: f32 = 9.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    /// Scored repositories matching the search box, best match first.
    pub(in crate::app) fn search_results(&self, limit: usize) -> Vec<String> {
        let query = self.search.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut hits = self
            .scores
            .scores()
            .iter()
            .filter_map(|score| {
                fuzzy_match_score(&matcher, &score.repo, query).map(|rank| (rank, &score.repo))
            })
            .collect::<Vec<_>>();
        hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        hits.into_iter()
            .take(limit)
            .map(|(_, repo)| repo.clone())
            .collect()
    }

    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let generation = self.session.generation();
        if let Some(cached) = &self.search_match_cache
            && cached.generation == generation
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .session
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.id, query).map(|_| index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            generation,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        if self.graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No repository pair meets the minimum edge count.",
                FontId::proportional(15.0),
                Color32::from_gray(170),
            );
            return;
        }

        self.session.set_viewport(rect);
        self.handle_pointer(ui, &response);

        let frame = self.session.step();
        if frame.phase.is_simulating() || self.session.is_interacting() {
            ui.ctx().request_repaint();
        }

        let search_matches = self.cached_search_matches();
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());
        let selected_index = self
            .selected
            .as_deref()
            .and_then(|id| self.graph.index_of(id));
        let focus = frame.hovered.or(selected_index);

        let nodes = self.session.nodes();
        let edges = self.session.edges();

        for projected in &frame.edges {
            let Some(edge) = edges.get(projected.index) else {
                continue;
            };
            let touches_focus =
                focus.is_some_and(|index| edge.source == index || edge.target == index);
            let mut color = dim_color(EDGE_COLOR, projected.brightness);
            if touches_focus {
                color = blend_color(color, HIGHLIGHT_COLOR, 0.75);
            } else if focus.is_some() || search_active {
                color = dim_color(color, 0.45);
            }
            let width = (edge.width as f32).max(0.5) * if touches_focus { 1.6 } else { 1.0 };
            painter.line_segment([projected.from, projected.to], Stroke::new(width, color));
        }

        for projected in &frame.nodes {
            if !circle_visible(rect, projected.screen, projected.radius) {
                continue;
            }
            let Some(node) = nodes.get(projected.index) else {
                continue;
            };

            let is_focus = focus == Some(projected.index);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&projected.index));

            let mut fill = dim_color(importance_color(node.importance), projected.brightness);
            if search_active && !is_match && !is_focus {
                fill = dim_color(fill, 0.35);
            }
            painter.circle_filled(projected.screen, projected.radius, fill);

            if is_focus {
                painter.circle_stroke(
                    projected.screen,
                    projected.radius + 2.0,
                    Stroke::new(2.0, HIGHLIGHT_COLOR),
                );
            } else if is_match {
                painter.circle_stroke(
                    projected.screen,
                    projected.radius + 1.5,
                    Stroke::new(1.5, SEARCH_COLOR),
                );
            }

            if is_focus || is_match || projected.radius >= LABEL_MIN_RADIUS {
                let text_color = dim_color(Color32::from_gray(225), projected.brightness);
                painter.text(
                    projected.screen + vec2(projected.radius + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    node.label.as_str(),
                    FontId::proportional(12.0),
                    text_color,
                );
            }
        }

        if let Some(index) = frame.hovered
            && let Some(node) = nodes.get(index)
        {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
            let mut tooltip = node.id.clone();
            if let Some(score) = self.scores.get(&node.id) {
                tooltip.push_str(&format!(
                    "\ncriticality {:.2}  wins {}/{}",
                    score.normalized_display(),
                    score.wins,
                    score.total_comparisons
                ));
            }
            painter.text(
                rect.left_bottom() + vec2(12.0, -12.0),
                Align2::LEFT_BOTTOM,
                tooltip,
                FontId::proportional(13.0),
                Color32::from_gray(235),
            );
        }

        if search_active {
            painter.text(
                rect.right_top() + vec2(-12.0, 12.0),
                Align2::RIGHT_TOP,
                format!("search: {}", self.search.trim()),
                FontId::proportional(12.0),
                SEARCH_COLOR,
            );
        }
    }
}
