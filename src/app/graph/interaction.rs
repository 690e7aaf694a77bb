use eframe::egui::{self, PointerButton, Ui};
use tracing::trace;

use crate::layout::SessionEvent;

use super::super::ViewModel;

impl ViewModel {
    /// Feeds egui pointer state into the layout session.
    pub(in crate::app) fn handle_pointer(&mut self, ui: &Ui, response: &egui::Response) {
        let mut events = Vec::new();

        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(origin) = origin {
                events.push(self.session.on_pointer_down(origin));
            }
        }

        if response.dragged_by(PointerButton::Primary) {
            if let Some(pointer) = response.interact_pointer_pos() {
                events.push(self.session.on_pointer_move(pointer));
            }
        } else if response.drag_stopped() {
            events.push(self.session.on_pointer_up());
        } else if let Some(pointer) = response.hover_pos() {
            events.push(self.session.on_pointer_move(pointer));
        } else if self.session.hovered().is_some() || self.session.is_interacting() {
            events.push(self.session.on_pointer_leave());
        }

        if response.clicked_by(PointerButton::Primary) {
            let selected = response
                .interact_pointer_pos()
                .and_then(|pointer| self.session.hit_test(pointer))
                .and_then(|index| self.session.nodes().get(index))
                .map(|node| node.id.clone());
            self.set_selected(selected);
        }

        for event in events {
            match event {
                SessionEvent::None => {}
                SessionEvent::DragEnded { node } => {
                    if let Some(dragged) = self.session.nodes().get(node) {
                        trace!(repo = %dragged.id, "node released");
                    }
                }
                other => trace!(?other, "layout pointer event"),
            }
        }
    }
}
