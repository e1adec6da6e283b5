//! Construction of the animated farm entities.
//!
//! Factories create detached nodes; the caller attaches them to the graph.
//! Preconditions (finite placement, positive speed, non-empty route) are
//! checked before any node is created, so a rejected call leaves the graph
//! untouched.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;

use super::graph::{NodeId, SceneGraph};
use super::model::{Crop, CropState, Equipment, EquipmentState, Livestock, LivestockState};
use crate::animation::equipment::heading_towards;
use crate::error::SceneError;
use crate::render::mesh::{Geometry, Material};

pub const FIELD_COUNT: usize = 4;
pub const CROP_COUNT: usize = 16;
pub const LIVESTOCK_COUNT: usize = 5;

pub const FIELD_COLOR: Material = Material::hex(0x5d4037);
pub const CROP_COLOR: Material = Material::hex(0x33691e);
pub const LIVESTOCK_COLOR: Material = Material::hex(0x8d6e63);
pub const TRACTOR_COLOR: Material = Material::hex(0xd32f2f);
pub const WHEEL_COLOR: Material = Material::hex(0x212121);

pub const TRACTOR_SPEED: f32 = 1.0;

pub const PATROL_ROUTE: [Vec3; 4] = [
    Vec3::new(30.0, 0.0, 30.0),
    Vec3::new(-30.0, 0.0, 30.0),
    Vec3::new(-30.0, 0.0, -30.0),
    Vec3::new(30.0, 0.0, -30.0),
];

const WHEEL_OFFSETS: [Vec3; 4] = [
    Vec3::new(-1.5, 1.0, -2.0),
    Vec3::new(1.5, 1.0, -2.0),
    Vec3::new(-1.5, 1.0, 2.0),
    Vec3::new(1.5, 1.0, 2.0),
];

/// Uniform samples in `[0, 1)`.
pub trait UniformSource {
    fn next_unit(&mut self) -> f32;

    fn range(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_unit()
    }
}

/// Unseeded thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl UniformSource for ThreadRandom {
    fn next_unit(&mut self) -> f32 {
        rand::random::<f32>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f32>,
    next: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, next: 0 }
    }
}

impl UniformSource for FixedSequence {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

pub(crate) fn check_placement(entity: &'static str, at: Vec3) -> Result<(), SceneError> {
    if at.is_finite() {
        Ok(())
    } else {
        Err(SceneError::NonFinitePlacement {
            entity,
            x: at.x,
            y: at.y,
            z: at.z,
        })
    }
}

/// Reference placement of field `index`.
pub fn field_placement(index: usize) -> Vec3 {
    Vec3::new(-20.0 + index as f32 * 15.0, 0.0, -20.0)
}

/// Reference placement of crop `index`, a 4 by 4 grid.
pub fn crop_placement(index: usize) -> Vec3 {
    Vec3::new(
        -20.0 + (index % 4) as f32 * 15.0,
        0.0,
        -20.0 + (index / 4) as f32 * 15.0,
    )
}

pub fn create_field(graph: &mut SceneGraph, at: Vec3) -> Result<NodeId, SceneError> {
    check_placement("field", at)?;

    let field = graph.create_mesh(
        Geometry::Box {
            width: 10.0,
            height: 0.2,
            depth: 10.0,
        },
        FIELD_COLOR,
    );
    let node = graph.node_mut(field);
    node.position = at;
    node.receive_shadow = true;
    Ok(field)
}

pub fn create_crop(
    graph: &mut SceneGraph,
    at: Vec3,
    rng: &mut impl UniformSource,
) -> Result<Crop, SceneError> {
    check_placement("crop", at)?;

    let height = rng.range(2.5, 3.5);
    let phase = rng.range(0.0, TAU);
    let initial_y = at.y + height / 2.0;

    let crop = graph.create_mesh(
        Geometry::Cone {
            radius: 1.0,
            height,
            segments: 8,
        },
        CROP_COLOR,
    );
    let node = graph.node_mut(crop);
    node.position = Vec3::new(at.x, initial_y, at.z);
    node.cast_shadow = true;

    Ok(Crop {
        node: crop,
        state: CropState::new(phase, initial_y),
    })
}

pub fn create_livestock(
    graph: &mut SceneGraph,
    at: Vec3,
    rng: &mut impl UniformSource,
) -> Result<Livestock, SceneError> {
    check_placement("livestock", at)?;

    let speed = rng.range(0.5, 1.0);
    let phase = rng.range(0.0, TAU);
    let state = LivestockState::new(at, phase, speed)?;

    let group = graph.create_group();

    let body = graph.create_mesh(
        Geometry::Box {
            width: 2.0,
            height: 1.5,
            depth: 3.0,
        },
        LIVESTOCK_COLOR,
    );
    graph.set_position(body, Vec3::new(0.0, 1.0, 0.0));
    graph.add_child(group, body);

    let head = graph.create_mesh(
        Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        },
        LIVESTOCK_COLOR,
    );
    graph.set_position(head, Vec3::new(0.0, 1.75, 1.5));
    graph.add_child(group, head);

    let node = graph.node_mut(group);
    node.position = at;
    node.cast_shadow = true;

    Ok(Livestock { node: group, state })
}

pub fn create_equipment(
    graph: &mut SceneGraph,
    at: Vec3,
    route: Vec<Vec3>,
    speed: f32,
) -> Result<Equipment, SceneError> {
    check_placement("equipment", at)?;
    let mut state = EquipmentState::new(route, speed, Vec::new())?;

    let group = graph.create_group();

    let body = graph.create_mesh(
        Geometry::Box {
            width: 4.0,
            height: 2.0,
            depth: 6.0,
        },
        TRACTOR_COLOR,
    );
    graph.set_position(body, Vec3::new(0.0, 2.0, 0.0));
    graph.add_child(group, body);

    let mut wheels = Vec::with_capacity(WHEEL_OFFSETS.len());
    for offset in WHEEL_OFFSETS {
        let wheel = graph.create_mesh(
            Geometry::Cylinder {
                radius: 1.0,
                height: 0.5,
                segments: 16,
            },
            WHEEL_COLOR,
        );
        let node = graph.node_mut(wheel);
        node.position = offset;
        node.rotation = Vec3::new(0.0, 0.0, FRAC_PI_2);
        graph.add_child(group, wheel);
        wheels.push(wheel);
    }
    state.attach_wheels(wheels);

    let node = graph.node_mut(group);
    node.position = at;
    node.cast_shadow = true;
    if let Some(heading) = heading_towards(state.current_target() - at) {
        node.rotation.y = heading;
    }

    Ok(Equipment { node: group, state })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_reference_placements() {
        assert_eq!(field_placement(0), Vec3::new(-20.0, 0.0, -20.0));
        assert_eq!(field_placement(3), Vec3::new(25.0, 0.0, -20.0));
        assert_eq!(crop_placement(5), Vec3::new(-5.0, 0.0, -5.0));
        assert_eq!(crop_placement(15), Vec3::new(25.0, 0.0, 25.0));
    }

    #[test]
    fn test_crop_is_lifted_by_half_its_height() {
        let mut graph = SceneGraph::new();
        let mut rng = FixedSequence::new(vec![0.5, 0.25]);
        let crop = create_crop(&mut graph, Vec3::new(1.0, 0.0, 2.0), &mut rng).unwrap();

        assert!((crop.state.initial_y() - 1.5).abs() < 1e-6);
        assert!((crop.state.phase() - TAU * 0.25).abs() < 1e-6);
        let node = graph.node(crop.node);
        assert_eq!(node.position, Vec3::new(1.0, 1.5, 2.0));
        assert!(node.cast_shadow);
    }

    #[test]
    fn test_livestock_anchor_is_placement() {
        let mut graph = SceneGraph::new();
        let mut rng = FixedSequence::new(vec![0.0]);
        let at = Vec3::new(-7.0, 0.0, 3.0);
        let animal = create_livestock(&mut graph, at, &mut rng).unwrap();

        assert_eq!(animal.state.initial_position(), at);
        assert_eq!(animal.state.speed(), 0.5);
        assert_eq!(graph.node(animal.node).position, at);
        assert_eq!(graph.node(animal.node).children().len(), 2);
    }

    #[test]
    fn test_equipment_has_four_wheels() {
        let mut graph = SceneGraph::new();
        let tractor =
            create_equipment(&mut graph, Vec3::ZERO, PATROL_ROUTE.to_vec(), TRACTOR_SPEED).unwrap();

        assert_eq!(tractor.state.wheels().len(), 4);
        for wheel in tractor.state.wheels() {
            assert_eq!(graph.node(*wheel).parent(), Some(tractor.node));
            assert!((graph.node(*wheel).rotation.z - FRAC_PI_2).abs() < 1e-6);
        }
        // Facing the first waypoint, (30, 0, 30), from the origin.
        assert!((graph.node(tractor.node).rotation.y - FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_rejected_equipment_leaves_graph_untouched() {
        let mut graph = SceneGraph::new();
        let err = create_equipment(&mut graph, Vec3::ZERO, Vec::new(), 1.0).unwrap_err();
        assert_eq!(err.kind(), "EmptyRoute");

        let err = create_equipment(&mut graph, Vec3::ZERO, PATROL_ROUTE.to_vec(), 0.0).unwrap_err();
        assert_eq!(err.kind(), "NonPositiveSpeed");
        assert!(graph.is_empty());
    }

    #[test]
    fn test_non_finite_placement_is_rejected() {
        let mut graph = SceneGraph::new();
        let err = create_field(&mut graph, Vec3::new(f32::NAN, 0.0, 0.0)).unwrap_err();
        assert_eq!(err.kind(), "NonFinitePlacement");
        assert!(graph.is_empty());
    }
}
