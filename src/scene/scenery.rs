//! Static backdrop: ground, farm buildings, mountains, bushes and rocks.
//! None of it belongs to a toggled collection, so it stays visible in every
//! view and is never animated.

use std::f32::consts::{FRAC_PI_4, TAU};

use glam::Vec3;

use super::factories::UniformSource;
use super::graph::{NodeId, SceneGraph};
use crate::render::mesh::{Geometry, Material};

const GROUND_COLOR: Material = Material::hex(0x7cba3d);
const BARN_COLOR: Material = Material::hex(0xa1362b);
const ROOF_COLOR: Material = Material::hex(0x4e342e);
const SILO_COLOR: Material = Material::hex(0xb0bec5);
const MOUNTAIN_COLOR: Material = Material::hex(0x6d7b8d);
const SNOW_COLOR: Material = Material::hex(0xf5f5f5);
const BUSH_COLOR: Material = Material::hex(0x2e7d32);
const ROCK_COLOR: Material = Material::hex(0x8a8a8a);

const MOUNTAIN_COUNT: usize = 9;
const MOUNTAIN_RING_RADIUS: f32 = 85.0;
const BUSH_COUNT: usize = 12;
const ROCK_COUNT: usize = 8;

pub struct Backdrop {
    pub ground: NodeId,
    pub barn: NodeId,
    pub silo: NodeId,
    pub mountains: Vec<NodeId>,
    pub bushes: Vec<NodeId>,
    pub rocks: Vec<NodeId>,
}

impl Backdrop {
    pub fn build(graph: &mut SceneGraph, rng: &mut impl UniformSource) -> Self {
        let ground = ground(graph);
        let barn = barn(graph, Vec3::new(-38.0, 0.0, 8.0));
        let silo = silo(graph, Vec3::new(-38.0, 0.0, -6.0));
        let mountains = mountains(graph, rng);
        let bushes = scatter(graph, rng, BUSH_COUNT, bush);
        let rocks = scatter(graph, rng, ROCK_COUNT, rock);

        Self {
            ground,
            barn,
            silo,
            mountains,
            bushes,
            rocks,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        [self.ground, self.barn, self.silo]
            .into_iter()
            .chain(self.mountains.iter().copied())
            .chain(self.bushes.iter().copied())
            .chain(self.rocks.iter().copied())
    }
}

fn ground(graph: &mut SceneGraph) -> NodeId {
    let ground = graph.create_mesh(
        Geometry::Plane {
            width: 100.0,
            depth: 100.0,
            tiles: 10,
        },
        GROUND_COLOR,
    );
    graph.node_mut(ground).receive_shadow = true;
    graph.add_to_root(ground);
    ground
}

fn barn(graph: &mut SceneGraph, at: Vec3) -> NodeId {
    let group = graph.create_group();

    let walls = graph.create_mesh(
        Geometry::Box {
            width: 10.0,
            height: 7.0,
            depth: 14.0,
        },
        BARN_COLOR,
    );
    graph.set_position(walls, Vec3::new(0.0, 3.5, 0.0));
    graph.add_child(group, walls);

    // Pitched roof: a box turned 45 degrees around the ridge line.
    let roof = graph.create_mesh(
        Geometry::Box {
            width: 7.2,
            height: 7.2,
            depth: 14.4,
        },
        ROOF_COLOR,
    );
    graph.set_position(roof, Vec3::new(0.0, 7.0, 0.0));
    graph.set_rotation(roof, Vec3::new(0.0, 0.0, FRAC_PI_4));
    graph.add_child(group, roof);

    let node = graph.node_mut(group);
    node.position = at;
    node.cast_shadow = true;
    graph.add_to_root(group);
    group
}

fn silo(graph: &mut SceneGraph, at: Vec3) -> NodeId {
    let group = graph.create_group();

    let tower = graph.create_mesh(
        Geometry::Cylinder {
            radius: 3.0,
            height: 14.0,
            segments: 16,
        },
        SILO_COLOR,
    );
    graph.set_position(tower, Vec3::new(0.0, 7.0, 0.0));
    graph.add_child(group, tower);

    let cap = graph.create_mesh(
        Geometry::Cone {
            radius: 3.2,
            height: 2.5,
            segments: 16,
        },
        ROOF_COLOR,
    );
    graph.set_position(cap, Vec3::new(0.0, 15.25, 0.0));
    graph.add_child(group, cap);

    let node = graph.node_mut(group);
    node.position = at;
    node.cast_shadow = true;
    graph.add_to_root(group);
    group
}

/// A ring of peaks beyond the ground plane with jittered height and spacing.
fn mountains(graph: &mut SceneGraph, rng: &mut impl UniformSource) -> Vec<NodeId> {
    (0..MOUNTAIN_COUNT)
        .map(|i| {
            let angle = (i as f32 + rng.range(-0.3, 0.3)) / MOUNTAIN_COUNT as f32 * TAU;
            let distance = MOUNTAIN_RING_RADIUS + rng.range(-8.0, 8.0);
            let height = rng.range(25.0, 45.0);
            let radius = rng.range(16.0, 24.0);

            let group = graph.create_group();
            let peak = graph.create_mesh(
                Geometry::Cone {
                    radius,
                    height,
                    segments: 7,
                },
                MOUNTAIN_COLOR,
            );
            graph.set_position(peak, Vec3::new(0.0, height / 2.0, 0.0));
            graph.add_child(group, peak);

            let snow_height = height * 0.25;
            let snow = graph.create_mesh(
                Geometry::Cone {
                    radius: radius * 0.25 + 0.2,
                    height: snow_height,
                    segments: 7,
                },
                SNOW_COLOR,
            );
            graph.set_position(snow, Vec3::new(0.0, height - snow_height / 2.0 + 0.05, 0.0));
            graph.add_child(group, snow);

            graph.set_position(
                group,
                Vec3::new(angle.sin() * distance, 0.0, angle.cos() * distance),
            );
            graph.add_to_root(group);
            group
        })
        .collect()
}

/// Places `count` props on the ground, away from the fields and patrol route.
fn scatter<R, F>(graph: &mut SceneGraph, rng: &mut R, count: usize, make: F) -> Vec<NodeId>
where
    R: UniformSource,
    F: Fn(&mut SceneGraph, &mut R) -> NodeId,
{
    (0..count)
        .map(|_| {
            let angle = rng.range(0.0, TAU);
            let distance = rng.range(36.0, 48.0);
            let prop = make(graph, rng);
            let node = graph.node_mut(prop);
            node.position.x = angle.sin() * distance;
            node.position.z = angle.cos() * distance;
            graph.add_to_root(prop);
            prop
        })
        .collect()
}

fn bush<R: UniformSource>(graph: &mut SceneGraph, rng: &mut R) -> NodeId {
    let size = rng.range(1.0, 2.0);
    let bush = graph.create_mesh(
        Geometry::Cone {
            radius: size,
            height: size * 1.4,
            segments: 6,
        },
        BUSH_COLOR,
    );
    let node = graph.node_mut(bush);
    node.position.y = size * 0.7;
    node.cast_shadow = true;
    bush
}

fn rock<R: UniformSource>(graph: &mut SceneGraph, rng: &mut R) -> NodeId {
    let size = rng.range(0.6, 1.6);
    let rock = graph.create_mesh(
        Geometry::Box {
            width: size * 1.3,
            height: size * 0.7,
            depth: size,
        },
        ROCK_COLOR,
    );
    let node = graph.node_mut(rock);
    node.position.y = size * 0.35;
    node.rotation = Vec3::new(0.0, rng.range(0.0, TAU), 0.0);
    node.cast_shadow = true;
    rock
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::factories::FixedSequence;

    #[test]
    fn test_backdrop_is_attached_and_visible() {
        let mut graph = SceneGraph::new();
        let mut rng = FixedSequence::new(vec![0.1, 0.9, 0.5, 0.3]);
        let backdrop = Backdrop::build(&mut graph, &mut rng);

        assert_eq!(backdrop.mountains.len(), MOUNTAIN_COUNT);
        assert_eq!(backdrop.bushes.len(), BUSH_COUNT);
        assert_eq!(backdrop.rocks.len(), ROCK_COUNT);
        for id in backdrop.nodes() {
            assert!(graph.roots().contains(&id));
            assert!(graph.is_visible(id));
        }
    }

    #[test]
    fn test_props_stay_outside_the_fields() {
        let mut graph = SceneGraph::new();
        let mut rng = FixedSequence::new(vec![0.0, 0.25, 0.5, 0.75, 0.99]);
        let backdrop = Backdrop::build(&mut graph, &mut rng);

        for id in backdrop.bushes.iter().chain(&backdrop.rocks) {
            let p = graph.node(*id).position;
            let distance = (p.x * p.x + p.z * p.z).sqrt();
            assert!((35.9..=48.1).contains(&distance), "prop at {distance}");
        }
    }
}
