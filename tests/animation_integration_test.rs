use std::f32::consts::FRAC_PI_2;

use farmview::animation::livestock::wander_target;
use farmview::animation::{Animator, Smoothing};
use farmview::scene::factories::{self, FixedSequence, PATROL_ROUTE};
use farmview::scene::graph::SceneGraph;
use farmview::scene::model::FarmModel;
use glam::Vec3;

fn rng() -> FixedSequence {
    FixedSequence::new(vec![0.25, 0.6, 0.9, 0.05, 0.4])
}

fn tractor_model(graph: &mut SceneGraph, at: Vec3, speed: f32) -> FarmModel {
    let tractor =
        factories::create_equipment(graph, at, PATROL_ROUTE.to_vec(), speed).expect("valid tractor");
    graph.add_to_root(tractor.node);
    FarmModel {
        equipment: vec![tractor],
        ..FarmModel::default()
    }
}

#[test]
fn test_animation_integration_crop_sway_bounded() {
    let mut graph = SceneGraph::new();
    let mut rng = rng();
    let mut model = FarmModel::default();
    for i in 0..4 {
        let crop = factories::create_crop(&mut graph, factories::crop_placement(i), &mut rng).unwrap();
        graph.add_to_root(crop.node);
        model.crops.push(crop);
    }

    let animator = Animator::default();
    for _ in 0..600 {
        animator.tick(&mut graph, &mut model, 1.0 / 30.0);
        for crop in &model.crops {
            let node = graph.node(crop.node);
            assert!(node.rotation.x.abs() <= 0.1 + 1e-6);
            assert!(node.rotation.z.abs() <= 0.1 + 1e-6);
            assert_eq!(node.rotation.y, 0.0);
            assert_eq!(node.position.y, crop.state.initial_y());
        }
    }
}

#[test]
fn test_animation_integration_livestock_closes_on_target() {
    let mut graph = SceneGraph::new();
    let mut rng = rng();
    let animal = factories::create_livestock(&mut graph, Vec3::new(4.0, 0.0, -6.0), &mut rng).unwrap();
    graph.add_to_root(animal.node);
    let id = animal.node;
    let mut model = FarmModel {
        livestock: vec![animal],
        ..FarmModel::default()
    };

    for smoothing in [Smoothing::PerFrame, Smoothing::TimeScaled] {
        let animator = Animator::new(smoothing);
        for _ in 0..20 {
            let before = graph.node(id).position;
            animator.tick(&mut graph, &mut model, 1.0 / 60.0);
            let target = wander_target(&model.livestock[0].state);
            let after = graph.node(id).position;

            let flat = |p: Vec3| Vec3::new(p.x, 0.0, p.z);
            assert!(flat(target - after).length() < flat(target - before).length());
            assert_eq!(after.y, 0.0);
        }
    }
}

#[test]
fn test_animation_integration_equipment_waypoint_advance() {
    let mut graph = SceneGraph::new();
    let mut model = tractor_model(&mut graph, Vec3::ZERO, 0.2);
    let id = model.equipment[0].node;
    graph.set_position(id, Vec3::new(29.5, 0.0, 30.0));

    Animator::default().tick(&mut graph, &mut model, 1.0);

    assert_eq!(model.equipment[0].state.route_index(), 1);
    let heading = graph.node(id).rotation.y;
    assert!((heading + FRAC_PI_2).abs() < 1e-4, "heading was {}", heading);
}

#[test]
fn test_animation_integration_route_wraps() {
    let mut graph = SceneGraph::new();
    let mut model = tractor_model(&mut graph, Vec3::ZERO, 1.0);
    let id = model.equipment[0].node;
    let animator = Animator::default();

    for (i, waypoint) in PATROL_ROUTE.iter().enumerate() {
        assert_eq!(model.equipment[0].state.route_index(), i);
        graph.set_position(id, *waypoint + Vec3::new(0.2, 0.0, 0.0));
        animator.tick(&mut graph, &mut model, 0.01);
    }
    assert_eq!(model.equipment[0].state.route_index(), 0);
}

#[test]
fn test_animation_integration_wheels_spin_at_fixed_rate() {
    let mut graph = SceneGraph::new();
    let mut model = tractor_model(&mut graph, Vec3::ZERO, 1.0);
    let wheels = model.equipment[0].state.wheels().to_vec();
    assert_eq!(wheels.len(), 4);

    let before: Vec<f32> = wheels.iter().map(|w| graph.node(*w).rotation.x).collect();
    Animator::default().tick(&mut graph, &mut model, 0.125);

    for (wheel, start) in wheels.iter().zip(before) {
        let spun = graph.node(*wheel).rotation.x - start;
        assert!((spun - 0.25).abs() < 1e-6);
        assert_eq!(graph.node(*wheel).rotation.z, FRAC_PI_2);
    }
}

#[test]
fn test_animation_integration_hidden_equipment_frozen() {
    let mut graph = SceneGraph::new();
    let mut model = tractor_model(&mut graph, Vec3::ZERO, 1.0);
    let id = model.equipment[0].node;
    let wheel = model.equipment[0].state.wheels()[0];
    graph.set_visible(id, false);

    let animator = Animator::default();
    for _ in 0..10 {
        animator.tick(&mut graph, &mut model, 0.1);
    }

    assert_eq!(graph.node(id).position, Vec3::ZERO);
    assert_eq!(graph.node(wheel).rotation.x, 0.0);
    assert_eq!(model.equipment[0].state.route_index(), 0);
}

#[test]
fn test_animation_integration_zero_delta_is_noop_for_equipment() {
    let mut graph = SceneGraph::new();
    let mut model = tractor_model(&mut graph, Vec3::new(5.0, 0.0, 5.0), 1.0);
    let id = model.equipment[0].node;

    Animator::default().tick(&mut graph, &mut model, 0.0);
    assert_eq!(graph.node(id).position, Vec3::new(5.0, 0.0, 5.0));
}
