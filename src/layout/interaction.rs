use eframe::egui::Pos2;

use super::{LayoutSession, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerMode {
    #[default]
    Idle,
    Dragging {
        node: usize,
        last: Pos2,
    },
    Rotating {
        last: Pos2,
    },
}

/// What a pointer event did to the session, for the caller to react to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEvent {
    None,
    DragStarted { node: usize },
    Dragged { node: usize },
    DragEnded { node: usize },
    RotateStarted,
    Rotated { rotation_x: f32, rotation_y: f32 },
    RotateEnded,
    HoverChanged { node: Option<usize> },
}

impl LayoutSession {
    /// Front-most node whose projected disc contains `pointer`.
    pub fn hit_test(&self, pointer: Pos2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        // Back to front, so a nearer node wins an equal distance.
        for node in self.frame().nodes {
            let distance = node.screen.distance(pointer);
            if distance > node.radius {
                continue;
            }
            if best.is_none_or(|(_, best_distance)| distance <= best_distance) {
                best = Some((node.index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Updates the hovered node and returns it.
    pub fn hover(&mut self, pointer: Pos2) -> Option<usize> {
        self.hovered = self.hit_test(pointer);
        self.hovered
    }

    /// Starts a drag on a node or a rotation on empty space. A gesture still
    /// in progress is ended first, so a missed release cannot leave a node
    /// pinned.
    pub fn on_pointer_down(&mut self, pointer: Pos2) -> SessionEvent {
        if self.pointer != PointerMode::Idle {
            self.on_pointer_up();
        }

        if let Some(index) = self.hit_test(pointer) {
            let node = &mut self.nodes[index];
            node.fixed = true;
            node.velocity = Vec3::ZERO;
            self.pointer = PointerMode::Dragging {
                node: index,
                last: pointer,
            };
            return SessionEvent::DragStarted { node: index };
        }

        self.pointer = PointerMode::Rotating { last: pointer };
        SessionEvent::RotateStarted
    }

    pub fn on_pointer_move(&mut self, pointer: Pos2) -> SessionEvent {
        match self.pointer {
            PointerMode::Dragging { node, last } => {
                self.pointer = PointerMode::Dragging {
                    node,
                    last: pointer,
                };
                let Some(target) = self.nodes.get_mut(node) else {
                    return SessionEvent::None;
                };
                target.position = self.view.drag(target.position, pointer - last);
                target.velocity = Vec3::ZERO;
                SessionEvent::Dragged { node }
            }
            PointerMode::Rotating { last } => {
                self.view
                    .rotate_by(pointer - last, self.config.rotate_sensitivity);
                self.pointer = PointerMode::Rotating { last: pointer };
                SessionEvent::Rotated {
                    rotation_x: self.view.rotation_x,
                    rotation_y: self.view.rotation_y,
                }
            }
            PointerMode::Idle => {
                let previous = self.hovered;
                let current = self.hover(pointer);
                if current == previous {
                    SessionEvent::None
                } else {
                    SessionEvent::HoverChanged { node: current }
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self) -> SessionEvent {
        let event = match self.pointer {
            PointerMode::Dragging { node, .. } => {
                if let Some(target) = self.nodes.get_mut(node) {
                    target.fixed = false;
                }
                SessionEvent::DragEnded { node }
            }
            PointerMode::Rotating { .. } => SessionEvent::RotateEnded,
            PointerMode::Idle => SessionEvent::None,
        };
        self.pointer = PointerMode::Idle;
        event
    }

    /// Pointer left the canvas: ends any gesture and clears hover.
    pub fn on_pointer_leave(&mut self) -> SessionEvent {
        let event = self.on_pointer_up();
        if event == SessionEvent::None && self.hovered.is_some() {
            self.hovered = None;
            return SessionEvent::HoverChanged { node: None };
        }
        self.hovered = None;
        event
    }
}
