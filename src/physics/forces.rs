use eframe::egui::{Vec2, vec2};

use crate::network::Link;

use super::ForceParams;

/// Unit direction from `from` to `to` and the distance between them.
///
/// Coincident points report a distance of 1 and a direction picked from the
/// index pair so that they still separate.
fn separation(from: Vec2, to: Vec2, from_index: usize, to_index: usize) -> (Vec2, f32) {
    let delta = to - from;
    let distance = delta.length();
    if distance > 0.0001 {
        return (delta / distance, distance);
    }

    let angle = ((from_index as f32) * 0.618_034 + (to_index as f32) * 0.414_214)
        * std::f32::consts::TAU;
    (vec2(angle.cos(), angle.sin()), 1.0)
}

pub(super) fn accumulate_centering(
    positions: &[Vec2],
    center: Vec2,
    strength: f32,
    forces: &mut [Vec2],
) {
    for (force, position) in forces.iter_mut().zip(positions) {
        *force += (center - *position) * strength;
    }
}

pub(super) fn accumulate_repulsion(
    positions: &[Vec2],
    radii: &[f32],
    params: &ForceParams,
    forces: &mut [Vec2],
) {
    let count = positions.len();
    for a in 0..count {
        for b in (a + 1)..count {
            let min_distance = radii[a] + radii[b] + params.collision_padding;
            let (direction, distance) = separation(positions[a], positions[b], a, b);
            if distance >= min_distance {
                continue;
            }

            let push = direction * distance * ((min_distance - distance) / distance)
                * params.repulsion
                * 0.5;
            forces[a] -= push;
            forces[b] += push;
        }
    }
}

pub(super) fn accumulate_springs(
    positions: &[Vec2],
    links: &[Link],
    params: &ForceParams,
    forces: &mut [Vec2],
) {
    let count = positions.len();
    for link in links {
        let (a, b) = (link.source, link.target);
        if a >= count || b >= count || a == b {
            continue;
        }

        let (direction, distance) = separation(positions[a], positions[b], a, b);
        let rest = params.spring_length + (1.0 - link.strength) * params.spring_slack;
        let pull = direction * (distance - rest) * params.spring * link.strength * 0.5;
        forces[a] += pull;
        forces[b] -= pull;
    }
}
