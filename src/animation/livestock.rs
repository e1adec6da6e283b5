use glam::Vec3;

use crate::scene::graph::Node;
use crate::scene::model::LivestockState;

pub const WANDER_RADIUS: f32 = 5.0;
const WANDER_Z_RATIO: f32 = 0.7;
const HEADING_EPSILON: f32 = 0.01;

/// Point on the Lissajous-like loop around the anchor for the current phase.
pub fn wander_target(state: &LivestockState) -> Vec3 {
    let anchor = state.initial_position();
    let phase = state.movement_phase();
    Vec3::new(
        anchor.x + phase.cos() * WANDER_RADIUS,
        anchor.y,
        anchor.z + (phase * WANDER_Z_RATIO).sin() * WANDER_RADIUS,
    )
}

/// Moves the animal a fraction `blend` of the way toward its wander target
/// on the ground plane and turns it to face the direction of travel.
pub fn wander(state: &mut LivestockState, node: &mut Node, delta: f32, blend: f32) {
    state.movement_phase += delta * state.speed();
    let target = wander_target(state);

    let dx = target.x - node.position.x;
    let dz = target.z - node.position.z;
    node.position.x += dx * blend;
    node.position.z += dz * blend;

    // Heading is undefined while standing still.
    if dx.hypot(dz) > HEADING_EPSILON {
        node.rotation.y = dx.atan2(dz);
    }
}
