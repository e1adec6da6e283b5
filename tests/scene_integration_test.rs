use farmview::render::FrameBuffer;
use farmview::scene::factories::FixedSequence;
use farmview::scene::graph::NodeId;
use farmview::scene::{FarmScene, SceneSettings, View};

fn build_scene() -> FarmScene {
    let mut rng = FixedSequence::new(vec![0.15, 0.8, 0.45, 0.3, 0.65, 0.95]);
    FarmScene::initialize(&SceneSettings::default(), 100, 30, &mut rng).expect("scene builds")
}

fn collection_visible(scene: &FarmScene, ids: Vec<NodeId>) -> bool {
    let graph = scene.graph();
    let shown = ids.iter().filter(|id| graph.is_visible(**id)).count();
    assert!(
        shown == 0 || shown == ids.len(),
        "collection partially visible: {} of {}",
        shown,
        ids.len()
    );
    shown == ids.len()
}

/// (fields, crops, livestock, equipment) visibility per collection.
fn visibility(scene: &FarmScene) -> (bool, bool, bool, bool) {
    let model = scene.model();
    (
        collection_visible(scene, model.fields.clone()),
        collection_visible(scene, model.crop_nodes().collect()),
        collection_visible(scene, model.livestock_nodes().collect()),
        collection_visible(scene, model.equipment_nodes().collect()),
    )
}

#[test]
fn test_scene_integration_view_table() {
    let mut scene = build_scene();

    scene.set_view(View::Fields);
    assert_eq!(visibility(&scene), (true, false, false, false));

    scene.set_view(View::Crops);
    assert_eq!(visibility(&scene), (true, true, false, false));

    scene.set_view(View::Livestock);
    assert_eq!(visibility(&scene), (true, false, true, false));

    scene.set_view(View::Equipment);
    assert_eq!(visibility(&scene), (true, false, false, true));
}

#[test]
fn test_scene_integration_view_by_name() {
    let mut scene = build_scene();

    scene.set_view_by_name("livestock");
    assert_eq!(scene.current_view(), Some(View::Livestock));
    assert_eq!(visibility(&scene), (true, false, true, false));

    scene.set_view_by_name("greenhouse");
    assert_eq!(scene.current_view(), None);
    assert_eq!(visibility(&scene), (false, false, false, false));

    // Recovers from the empty state.
    scene.set_view_by_name("crops");
    assert_eq!(visibility(&scene), (true, true, false, false));
}

#[test]
fn test_scene_integration_set_view_is_idempotent() {
    let mut scene = build_scene();
    scene.set_view(View::Equipment);
    let once = visibility(&scene);
    scene.set_view(View::Equipment);
    assert_eq!(visibility(&scene), once);
}

#[test]
fn test_scene_integration_backdrop_always_visible() {
    let mut scene = build_scene();
    for view in View::ALL {
        scene.set_view(view);
        let graph = scene.graph();
        assert!(scene.backdrop().nodes().all(|id| graph.is_visible(id)));
    }
    scene.set_view_by_name("nothing");
    let graph = scene.graph();
    assert!(scene.backdrop().nodes().all(|id| graph.is_visible(id)));
}

#[test]
fn test_scene_integration_hidden_objects_frozen() {
    let mut scene = build_scene();
    scene.set_view(View::Fields);

    let snapshot = |scene: &FarmScene| {
        scene
            .model()
            .all_nodes()
            .map(|id| {
                let node = scene.graph().node(id);
                (node.position, node.rotation)
            })
            .collect::<Vec<_>>()
    };
    let crop_phases = |scene: &FarmScene| {
        scene
            .model()
            .crops
            .iter()
            .map(|c| c.state.phase())
            .collect::<Vec<_>>()
    };

    let before = snapshot(&scene);
    let phases_before = crop_phases(&scene);
    for _ in 0..30 {
        scene.tick(0.1);
    }
    assert_eq!(snapshot(&scene), before);
    assert_eq!(crop_phases(&scene), phases_before);

    scene.set_view(View::Crops);
    scene.tick(0.1);
    assert_ne!(crop_phases(&scene), phases_before);
}

#[test]
fn test_scene_integration_only_active_collection_moves() {
    let mut scene = build_scene();
    scene.set_view(View::Equipment);

    let tractor = scene.model().equipment[0].node;
    let animal = scene.model().livestock[0].node;
    let tractor_start = scene.graph().node(tractor).position;
    let animal_start = scene.graph().node(animal).position;

    scene.tick(0.5);

    assert_ne!(scene.graph().node(tractor).position, tractor_start);
    assert_eq!(scene.graph().node(animal).position, animal_start);
}

#[test]
fn test_scene_integration_render_each_view() {
    let mut scene = build_scene();
    let mut frame = FrameBuffer::new(100, 30);

    for view in View::ALL {
        scene.set_view(view);
        scene.tick(1.0 / 30.0);
        scene.render(&mut frame);
        assert_eq!(frame.width(), 100);
        assert_eq!(frame.height(), 30);
        let drawn = (0..30)
            .flat_map(|y| frame.row(y).iter())
            .filter(|c| !c.is_empty())
            .count();
        assert!(drawn > 0, "view {} drew nothing", view);
    }
}
