use crate::config::PhysicsConfig;
use crate::graph::{GraphEdge, GraphNode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Force-directed layout: random initial placement on the canvas, then a
/// fixed number of simulation steps combining link attraction toward a rest
/// distance, O(n²) pairwise repulsion, and a weak centering pull on both
/// axes. No stopping criterion besides the iteration count; unseeded runs
/// draw initial positions from OS entropy and are only qualitatively
/// reproducible.
pub(super) fn assign_positions(
    nodes: &mut [GraphNode],
    edges: &[GraphEdge],
    config: &PhysicsConfig,
) {
    let mut rng: StdRng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();
    let links: Vec<(usize, usize)> = edges
        .iter()
        .filter_map(|edge| {
            let from = *index.get(edge.source.as_str())?;
            let to = *index.get(edge.target.as_str())?;
            (from != to).then_some((from, to))
        })
        .collect();

    let mut positions: Vec<(f32, f32)> = (0..nodes.len())
        .map(|_| {
            (
                rng.random_range(0.0..config.canvas_width),
                rng.random_range(0.0..config.canvas_height),
            )
        })
        .collect();
    let mut velocities: Vec<(f32, f32)> = vec![(0.0, 0.0); nodes.len()];
    let center = (config.canvas_width / 2.0, config.canvas_height / 2.0);

    for _ in 0..config.iterations {
        let mut forces: Vec<(f32, f32)> = vec![(0.0, 0.0); nodes.len()];

        // many-body repulsion, softened so coincident nodes stay bounded
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let dist2 = (dx * dx + dy * dy).max(config.softening);
                let dist = dist2.sqrt();
                let f = config.repulsion / dist2;
                let fx = f * dx / dist;
                let fy = f * dy / dist;
                forces[i].0 += fx;
                forces[i].1 += fy;
                forces[j].0 -= fx;
                forces[j].1 -= fy;
            }
        }

        // spring toward the rest distance along each link
        for &(from, to) in &links {
            let dx = positions[to].0 - positions[from].0;
            let dy = positions[to].1 - positions[from].1;
            let len = (dx * dx + dy * dy).sqrt().max(0.001);
            let stretch = len - config.link_distance;
            let f = config.link_strength * stretch;
            let fx = f * dx / len;
            let fy = f * dy / len;
            forces[from].0 += fx;
            forces[from].1 += fy;
            forces[to].0 -= fx;
            forces[to].1 -= fy;
        }

        // weak centering on both axes
        for (idx, position) in positions.iter().enumerate() {
            forces[idx].0 += config.centering_strength * (center.0 - position.0);
            forces[idx].1 += config.centering_strength * (center.1 - position.1);
        }

        for idx in 0..positions.len() {
            let velocity = &mut velocities[idx];
            velocity.0 = (velocity.0 + forces[idx].0 * config.time_step) * config.damping;
            velocity.1 = (velocity.1 + forces[idx].1 * config.time_step) * config.damping;

            let mut step_x = velocity.0 * config.time_step;
            let mut step_y = velocity.1 * config.time_step;
            let step_len = (step_x * step_x + step_y * step_y).sqrt();
            if step_len > config.max_step {
                step_x *= config.max_step / step_len;
                step_y *= config.max_step / step_len;
            }
            positions[idx].0 += step_x;
            positions[idx].1 += step_y;
        }
    }

    for (node, position) in nodes.iter_mut().zip(positions) {
        node.x = if position.0.is_finite() {
            position.0
        } else {
            center.0
        };
        node.y = if position.1.is_finite() {
            position.1
        } else {
            center.1
        };
    }
}
