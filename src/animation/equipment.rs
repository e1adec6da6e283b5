use glam::Vec3;

use crate::scene::graph::{NodeId, SceneGraph};
use crate::scene::model::EquipmentState;

/// World units per second for each unit of equipment speed.
pub const PATROL_SPEED_SCALE: f32 = 5.0;
pub const ARRIVAL_RADIUS: f32 = 1.0;
pub const WHEEL_SPIN_RATE: f32 = 2.0;
const HEADING_EPSILON: f32 = 0.1;

/// Heading about Y that points local +Z along `direction`, if it is long
/// enough to define one.
pub fn heading_towards(direction: Vec3) -> Option<f32> {
    (direction.length() > HEADING_EPSILON).then(|| direction.x.atan2(direction.z))
}

/// Drives the vehicle toward its current waypoint. Arrival is judged on the
/// distance before this frame's step; on arrival the route index advances
/// and the vehicle turns to face the next waypoint. Wheels spin at a fixed
/// rate independent of ground speed.
pub fn patrol(state: &mut EquipmentState, graph: &mut SceneGraph, vehicle: NodeId, delta: f32) {
    let target = state.current_target();
    let node = graph.node_mut(vehicle);

    let offset = target - node.position;
    let distance = offset.length();
    node.position += offset.normalize_or_zero() * state.speed() * delta * PATROL_SPEED_SCALE;

    if distance < ARRIVAL_RADIUS {
        let next = state.advance();
        if let Some(heading) = heading_towards(next - node.position) {
            node.rotation.y = heading;
        }
    }

    for wheel in state.wheels() {
        graph.node_mut(*wheel).rotation.x += delta * WHEEL_SPIN_RATE;
    }
}
