use crate::config::LayoutConfig;

use super::vector::Vec3;
use super::{LayoutEdge, LayoutNode};

/// Unit direction for two nodes sitting on the same point, opposite for the
/// two members of the pair.
fn separation_direction(index: usize, other: usize) -> Vec3 {
    let (low, high) = (index.min(other), index.max(other));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let direction = Vec3::new(angle.cos(), angle.sin(), 0.0);
    if index < other { direction } else { -direction }
}

/// Advances the simulation by one frame.
///
/// Forces are evaluated against the positions at the start of the frame.
/// Repulsion and gravity are damped before the spring impulses are added.
/// Pinned nodes neither receive forces nor move.
pub(super) fn step_physics(
    nodes: &mut [LayoutNode],
    edges: &[LayoutEdge],
    config: &LayoutConfig,
    positions: &mut Vec<Vec3>,
) {
    let node_count = nodes.len();
    positions.clear();
    positions.extend(nodes.iter().map(|node| node.position));

    for index in 0..node_count {
        if nodes[index].fixed {
            continue;
        }

        let point = positions[index];
        let mut velocity = nodes[index].velocity;
        for (other, &other_point) in positions.iter().enumerate() {
            if other == index {
                continue;
            }

            let delta = point - other_point;
            let length = delta.length();
            let direction = if length > 0.0001 {
                delta / length
            } else {
                separation_direction(index, other)
            };
            let distance = length + 1.0;
            velocity += direction * (config.repulsion / (distance * distance));
        }

        velocity -= point * config.central_gravity;
        nodes[index].velocity = velocity * config.damping;
    }

    for edge in edges {
        let (source, target) = (edge.source, edge.target);
        if source >= node_count || target >= node_count || source == target {
            continue;
        }

        let delta = positions[target] - positions[source];
        let distance = delta.length();
        if distance <= 0.0001 {
            continue;
        }
        let pull = delta / distance * ((distance - config.spring_length) * config.spring_strength);

        if !nodes[source].fixed {
            nodes[source].velocity += pull;
        }
        if !nodes[target].fixed {
            nodes[target].velocity -= pull;
        }
    }

    for node in nodes.iter_mut() {
        if node.fixed {
            node.velocity = Vec3::ZERO;
            continue;
        }
        node.position += node.velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, position: Vec3) -> LayoutNode {
        LayoutNode {
            id: id.to_owned(),
            label: id.to_owned(),
            importance: 0.0,
            size: 10.0,
            position,
            velocity: Vec3::ZERO,
            fixed: false,
        }
    }

    fn edge(source: usize, target: usize) -> LayoutEdge {
        LayoutEdge {
            source,
            target,
            count: 2,
            avg_multiplier: 1.0,
            width: 1.0,
        }
    }

    #[test]
    fn repulsion_pushes_pair_apart_symmetrically() {
        let config = LayoutConfig {
            central_gravity: 0.0,
            ..LayoutConfig::default()
        };
        let mut nodes = vec![
            node("a", Vec3::new(-10.0, 0.0, 0.0)),
            node("b", Vec3::new(10.0, 0.0, 0.0)),
        ];
        let mut scratch = Vec::new();
        step_physics(&mut nodes, &[], &config, &mut scratch);

        // 1200 / 21^2, then damped.
        let expected = 1200.0 / (21.0 * 21.0) * 0.85;
        assert!((nodes[0].velocity.x + expected).abs() < 1e-4);
        assert!((nodes[1].velocity.x - expected).abs() < 1e-4);
        assert!(nodes[0].position.x < -10.0);
        assert!(nodes[1].position.x > 10.0);
    }

    #[test]
    fn stretched_spring_pulls_endpoints_together() {
        let config = LayoutConfig {
            repulsion: 0.0,
            central_gravity: 0.0,
            ..LayoutConfig::default()
        };
        let mut nodes = vec![
            node("a", Vec3::new(0.0, 0.0, 0.0)),
            node("b", Vec3::new(380.0, 0.0, 0.0)),
        ];
        let mut scratch = Vec::new();
        step_physics(&mut nodes, &[edge(0, 1)], &config, &mut scratch);

        // (380 - 180) * 0.02, added after damping.
        assert!((nodes[0].velocity.x - 4.0).abs() < 1e-4);
        assert!((nodes[1].velocity.x + 4.0).abs() < 1e-4);
        assert!((nodes[0].position.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn spring_impulse_is_not_damped_after_existing_motion() {
        let config = LayoutConfig {
            repulsion: 0.0,
            central_gravity: 0.0,
            ..LayoutConfig::default()
        };
        let mut nodes = vec![
            node("a", Vec3::new(0.0, 0.0, 0.0)),
            node("b", Vec3::new(380.0, 0.0, 0.0)),
        ];
        nodes[0].velocity = Vec3::new(0.0, 2.0, 0.0);
        let mut scratch = Vec::new();
        step_physics(&mut nodes, &[edge(0, 1)], &config, &mut scratch);

        assert!((nodes[0].velocity.y - 1.7).abs() < 1e-4);
        assert!((nodes[0].velocity.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn gravity_pulls_lone_node_toward_origin() {
        let mut nodes = vec![node("a", Vec3::new(100.0, -50.0, 20.0))];
        let mut scratch = Vec::new();
        step_physics(&mut nodes, &[], &LayoutConfig::default(), &mut scratch);
        assert!((nodes[0].velocity.x + 100.0 * 0.005 * 0.85).abs() < 1e-4);
        assert!(nodes[0].position.length() < Vec3::new(100.0, -50.0, 20.0).length());
    }

    #[test]
    fn pinned_nodes_stay_put_and_do_not_pull() {
        let mut nodes = vec![
            node("a", Vec3::new(0.0, 0.0, 0.0)),
            node("b", Vec3::new(400.0, 0.0, 0.0)),
        ];
        nodes[0].fixed = true;
        let mut scratch = Vec::new();
        step_physics(&mut nodes, &[edge(0, 1)], &LayoutConfig::default(), &mut scratch);
        assert_eq!(nodes[0].position, Vec3::ZERO);
        assert_eq!(nodes[0].velocity, Vec3::ZERO);
        assert!(nodes[1].position.x < 400.0);
    }

    #[test]
    fn coincident_nodes_separate() {
        let mut nodes = vec![node("a", Vec3::ZERO), node("b", Vec3::ZERO)];
        let mut scratch = Vec::new();
        step_physics(&mut nodes, &[], &LayoutConfig::default(), &mut scratch);
        assert!(nodes[0].position.is_finite());
        assert!((nodes[0].position - nodes[1].position).length() > 1.0);
    }

    #[test]
    fn stale_edges_are_skipped() {
        let mut nodes = vec![node("a", Vec3::new(5.0, 0.0, 0.0))];
        let mut scratch = Vec::new();
        step_physics(&mut nodes, &[edge(0, 3)], &LayoutConfig::default(), &mut scratch);
        assert!(nodes[0].position.is_finite());
    }
}
