mod interaction;
mod physics;
mod projection;
mod vector;

pub use interaction::{PointerMode, SessionEvent};
pub use projection::{Projected, View, depth_brightness};
pub use vector::Vec3;

use eframe::egui::{Pos2, Rect};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::LayoutConfig;
use crate::graph::DependencyGraph;
use crate::util::stable_triple;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub label: String,
    pub importance: f64,
    pub size: f64,
    pub position: Vec3,
    #[serde(skip)]
    pub velocity: Vec3,
    #[serde(skip)]
    pub fixed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutEdge {
    pub source: usize,
    pub target: usize,
    pub count: u32,
    pub avg_multiplier: f64,
    pub width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    Simulating { frame: u32 },
    Settled { frames: u32 },
}

impl Phase {
    pub fn is_simulating(self) -> bool {
        matches!(self, Self::Simulating { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedNode {
    pub index: usize,
    pub screen: Pos2,
    pub radius: f32,
    pub depth: f32,
    pub brightness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedEdge {
    pub index: usize,
    pub from: Pos2,
    pub to: Pos2,
    pub depth: f32,
    pub brightness: f32,
}

/// One rendered frame. Nodes and edges are ordered back to front.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub phase: Phase,
    pub nodes: Vec<ProjectedNode>,
    pub edges: Vec<ProjectedEdge>,
    pub hovered: Option<usize>,
}

/// Mutable simulation context for one graph: node state, camera and pointer
/// mode. Reloading replaces all of it at once.
#[derive(Debug)]
pub struct LayoutSession {
    config: LayoutConfig,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    view: View,
    phase: Phase,
    pointer: PointerMode,
    hovered: Option<usize>,
    generation: u64,
    scratch: Vec<Vec3>,
}

impl LayoutSession {
    pub fn new(config: LayoutConfig) -> Self {
        let view = View {
            perspective_distance: config.perspective_distance,
            ..View::default()
        };
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            view,
            phase: Phase::Uninitialized,
            pointer: PointerMode::Idle,
            hovered: None,
            generation: 0,
            scratch: Vec::new(),
        }
    }

    pub fn from_graph(graph: &DependencyGraph, config: LayoutConfig) -> Self {
        let mut session = Self::new(config);
        session.load(graph);
        session
    }

    /// Replaces the simulated graph. Rotation and viewport survive a reload.
    pub fn load(&mut self, graph: &DependencyGraph) {
        let spread = self.config.initial_spread;
        self.nodes = graph
            .nodes
            .iter()
            .map(|node| {
                let (x, y, z) = stable_triple(&node.id);
                LayoutNode {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    importance: node.importance,
                    size: node.size,
                    position: Vec3::new(x, y, z) * spread,
                    velocity: Vec3::ZERO,
                    fixed: false,
                }
            })
            .collect();

        self.edges = graph
            .edges
            .iter()
            .filter_map(|edge| {
                let source = graph.index_of(&edge.source)?;
                let target = graph.index_of(&edge.target)?;
                Some(LayoutEdge {
                    source,
                    target,
                    count: edge.count,
                    avg_multiplier: edge.avg_multiplier(),
                    width: edge.width(),
                })
            })
            .collect();

        self.phase = Phase::Simulating { frame: 0 };
        self.pointer = PointerMode::Idle;
        self.hovered = None;
        self.generation += 1;
        self.scratch.clear();

        info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            generation = self.generation,
            "layout loaded"
        );
    }

    /// Runs one physics frame when simulating, then projects the scene.
    pub fn step(&mut self) -> Frame {
        self.advance();
        self.frame()
    }

    fn advance(&mut self) {
        let Phase::Simulating { frame } = self.phase else {
            return;
        };

        physics::step_physics(&mut self.nodes, &self.edges, &self.config, &mut self.scratch);

        let frame = frame + 1;
        if frame >= self.config.max_frames {
            self.phase = Phase::Settled { frames: frame };
            debug!(frames = frame, "layout settled");
        } else {
            self.phase = Phase::Simulating { frame };
        }
    }

    /// Runs frames until the layout settles. Returns the number of frames run.
    pub fn settle(&mut self) -> u32 {
        let mut ran = 0;
        while self.phase.is_simulating() {
            self.advance();
            ran += 1;
        }
        ran
    }

    /// Projects the current state without advancing the simulation.
    pub fn frame(&self) -> Frame {
        let projected = self
            .nodes
            .iter()
            .map(|node| self.view.project(node.position))
            .collect::<Vec<_>>();

        let (nearest, farthest) = projected
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(near, far), point| {
                (near.min(point.rotated.z), far.max(point.rotated.z))
            });

        let mut nodes = projected
            .iter()
            .zip(&self.nodes)
            .enumerate()
            .map(|(index, (point, node))| ProjectedNode {
                index,
                screen: point.screen,
                radius: node.size as f32 * point.scale,
                depth: point.rotated.z,
                brightness: depth_brightness(point.rotated.z, nearest, farthest),
            })
            .collect::<Vec<_>>();
        nodes.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        let node_count = self.nodes.len();
        let mut edges = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.source < node_count && edge.target < node_count)
            .map(|(index, edge)| {
                let from = projected[edge.source];
                let to = projected[edge.target];
                let depth = (from.rotated.z + to.rotated.z) * 0.5;
                ProjectedEdge {
                    index,
                    from: from.screen,
                    to: to.screen,
                    depth,
                    brightness: depth_brightness(depth, nearest, farthest),
                }
            })
            .collect::<Vec<_>>();
        edges.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        Frame {
            phase: self.phase,
            nodes,
            edges,
            hovered: self.hovered,
        }
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.view.viewport = viewport;
    }

    pub fn rotation(&self) -> (f32, f32) {
        (self.view.rotation_x, self.view.rotation_y)
    }

    pub fn reset_view(&mut self) {
        self.view.rotation_x = 0.0;
        self.view.rotation_y = 0.0;
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pointer(&self) -> PointerMode {
        self.pointer
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Bumped on every reload; node indices from an older generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn positions(&self) -> Vec<(String, Vec3)> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.position))
            .collect()
    }

    pub fn is_interacting(&self) -> bool {
        !matches!(self.pointer, PointerMode::Idle)
    }
}
