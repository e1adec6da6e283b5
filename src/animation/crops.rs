use crate::scene::graph::Node;
use crate::scene::model::CropState;

pub const SWAY_RATE: f32 = 0.5;
pub const SWAY_AMPLITUDE: f32 = 0.1;
const SWAY_Z_RATIO: f32 = 0.7;

/// Advances the sway phase and sets the tilt outright from it, so the
/// orientation depends only on the phase and never accumulates error.
pub fn sway(state: &mut CropState, node: &mut Node, delta: f32) {
    state.phase += delta * SWAY_RATE;
    node.rotation.x = state.phase.sin() * SWAY_AMPLITUDE;
    node.rotation.z = (state.phase * SWAY_Z_RATIO).cos() * SWAY_AMPLITUDE;
}
