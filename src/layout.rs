use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::entity::Category;
use crate::network::Node;
use crate::util::stable_pair;

const CLUSTER_RADIUS_FRACTION: f32 = 0.3;
const MIN_SPREAD: f32 = 30.0;
const MAX_SPREAD: f32 = 80.0;

/// Cluster centers for the categories present in `nodes`, in category order.
pub fn cluster_centers(nodes: &[Node], size: Vec2) -> Vec<(Category, Vec2)> {
    let present = Category::ALL
        .into_iter()
        .filter(|category| nodes.iter().any(|node| node.category() == *category))
        .collect::<Vec<_>>();

    let center = size * 0.5;
    let ring = CLUSTER_RADIUS_FRACTION * size.x.min(size.y);
    let count = present.len() as f32;

    present
        .into_iter()
        .enumerate()
        .map(|(index, category)| {
            let angle = (index as f32 / count) * TAU;
            (category, center + vec2(angle.cos(), angle.sin()) * ring)
        })
        .collect()
}

/// Seed positions: each node lands at a random offset around its category's
/// cluster center. The same `seed` reproduces the same layout.
pub fn initial_positions(nodes: &[Node], size: Vec2, seed: u64) -> Vec<Vec2> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let centers = cluster_centers(nodes, size);

    nodes
        .iter()
        .map(|node| {
            let cluster = centers
                .iter()
                .find(|(category, _)| *category == node.category())
                .map(|(_, center)| *center)
                .unwrap_or(size * 0.5);

            let (angle_t, radius_t) = stable_pair(&node.id, seed);
            let angle = angle_t * TAU;
            let spread = MIN_SPREAD + radius_t * (MAX_SPREAD - MIN_SPREAD);
            cluster + vec2(angle.cos(), angle.sin()) * spread
        })
        .collect()
}

/// Writes seed positions into the nodes and zeroes their velocities.
pub fn apply_initial_layout(nodes: &mut [Node], size: Vec2, seed: u64) {
    let positions = initial_positions(nodes, size, seed);
    for (node, position) in nodes.iter_mut().zip(positions) {
        node.position = position;
        node.velocity = Vec2::ZERO;
    }
}
