use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadTree;

const COINCIDENT_SQ: f32 = 1e-12;
const CHARGE_DISTANCE_MIN_SQ: f32 = 1.0;

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    /// Charge strength already scaled by alpha.
    pub(super) strength: f32,
    pub(super) theta_sq: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) reach_sq: f32,
}

/// Unit stand-in for `to - from` when both sit on the same point.
///
/// Swapping the arguments flips the sign, so a coincident pair is always pushed apart.
pub(super) fn coincident_offset(from: usize, to: usize) -> Vec2 {
    let (low, high, sign) = if from < to {
        (from, to, 1.0)
    } else {
        (to, from, -1.0)
    };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214 + 0.13) * TAU;
    vec2(angle.cos(), angle.sin()) * sign
}

fn charge_between(index: usize, other: usize, positions: &[Vec2], strength: f32) -> Vec2 {
    let mut offset = positions[other] - positions[index];
    let mut distance_sq = offset.length_sq();
    if distance_sq <= COINCIDENT_SQ {
        offset = coincident_offset(index, other);
        distance_sq = offset.length_sq();
    }
    offset * (strength / distance_sq.max(CHARGE_DISTANCE_MIN_SQ))
}

pub(super) fn accumulate_charge(
    tree: &QuadTree,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    if tree.count <= 0.0 {
        return;
    }

    if tree.is_leaf() {
        for &other in &tree.members {
            if other != index {
                *velocity += charge_between(index, other, positions, params.strength);
            }
        }
        return;
    }

    let point = positions[index];
    let offset = tree.centroid - point;
    let distance_sq = offset.length_sq();
    let side = tree.cell.side();
    if !tree.cell.contains(point) && side * side < params.theta_sq * distance_sq {
        let weight = params.strength * tree.count / distance_sq.max(CHARGE_DISTANCE_MIN_SQ);
        *velocity += offset * weight;
        return;
    }

    for child in tree.children() {
        accumulate_charge(child, index, positions, params, velocity);
    }
}

// Small bodies give way to big ones.
fn resolve_overlap(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    deltas: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut offset = predicted[from] - predicted[to];
    let mut distance_sq = offset.length_sq();
    if distance_sq >= reach * reach {
        return;
    }

    if distance_sq <= COINCIDENT_SQ {
        offset = coincident_offset(to, from);
        distance_sq = 1.0;
    }

    let distance = distance_sq.sqrt();
    let push = offset * ((reach - distance) / distance * strength);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let from_share = if from_sq + to_sq > 0.0 {
        to_sq / (from_sq + to_sq)
    } else {
        0.5
    };

    deltas[from] += push * from_share;
    deltas[to] -= push * (1.0 - from_share);
}

// Every possibly overlapping pair is visited exactly once.
pub(super) fn accumulate_collisions(
    tree_a: &QuadTree,
    tree_b: &QuadTree,
    same_tree: bool,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    if tree_a.cell.gap_sq(tree_b.cell) > params.reach_sq {
        return;
    }

    if tree_a.is_leaf() && tree_b.is_leaf() {
        if same_tree {
            for (position, &from) in tree_a.members.iter().enumerate() {
                for &to in &tree_a.members[position + 1..] {
                    resolve_overlap(from, to, predicted, radii, params.strength, deltas);
                }
            }
        } else {
            for &from in &tree_a.members {
                for &to in &tree_b.members {
                    resolve_overlap(from, to, predicted, radii, params.strength, deltas);
                }
            }
        }
        return;
    }

    if same_tree {
        let children = tree_a.children().collect::<Vec<_>>();
        for (position, child) in children.iter().enumerate() {
            accumulate_collisions(child, child, true, predicted, radii, params, deltas);
            for other in &children[position + 1..] {
                accumulate_collisions(child, other, false, predicted, radii, params, deltas);
            }
        }
        return;
    }

    let split_a = !tree_a.is_leaf()
        && (tree_b.is_leaf() || tree_a.cell.half_extent >= tree_b.cell.half_extent);
    if split_a {
        for child in tree_a.children() {
            accumulate_collisions(child, tree_b, false, predicted, radii, params, deltas);
        }
    } else {
        for child in tree_b.children() {
            accumulate_collisions(tree_a, child, false, predicted, radii, params, deltas);
        }
    }
}

pub(super) fn centering_offset(positions: &[Vec2], target: Vec2, strength: f32) -> Vec2 {
    if positions.is_empty() {
        return Vec2::ZERO;
    }

    let centroid = positions.iter().fold(Vec2::ZERO, |sum, point| sum + *point)
        / positions.len() as f32;
    (target - centroid) * strength
}
