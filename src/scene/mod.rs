pub mod factories;
pub mod graph;
pub mod model;
pub mod scenery;
pub mod view;

use glam::Vec3;

use crate::animation::{Animator, Smoothing};
use crate::error::SceneError;
use crate::render::{FrameBuffer, Light, OrbitControls, PerspectiveCamera, Sky};
use factories::{
    CROP_COUNT, FIELD_COUNT, LIVESTOCK_COUNT, PATROL_ROUTE, TRACTOR_SPEED, UniformSource,
};
use graph::SceneGraph;
use model::FarmModel;
use scenery::Backdrop;

pub use view::View;

const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;

/// Everything [`FarmScene::initialize`] needs from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings {
    pub fov_degrees: f32,
    pub camera_position: Vec3,
    pub damping: f32,
    pub smoothing: Smoothing,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            camera_position: Vec3::new(50.0, 30.0, 50.0),
            damping: 0.05,
            smoothing: Smoothing::default(),
        }
    }
}

/// One live diorama: graph, registry, camera and animator. Dropping it
/// tears the whole scene down.
pub struct FarmScene {
    graph: SceneGraph,
    model: FarmModel,
    backdrop: Backdrop,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    animator: Animator,
    light: Light,
    sky: Sky,
    view: Option<View>,
}

impl FarmScene {
    /// Builds the full scene for a `width` by `height` cell surface.
    /// Fields start visible and every other collection hidden.
    pub fn initialize(
        settings: &SceneSettings,
        width: u16,
        height: u16,
        rng: &mut impl UniformSource,
    ) -> Result<Self, SceneError> {
        let mut graph = SceneGraph::new();
        let backdrop = Backdrop::build(&mut graph, rng);
        let model = populate(&mut graph, rng)?;

        let mut camera = PerspectiveCamera::new(settings.fov_degrees, 1.0, CAMERA_NEAR, CAMERA_FAR);
        camera.position = settings.camera_position;
        camera.look_at(Vec3::ZERO);
        camera.set_viewport(width, height);
        let controls = OrbitControls::new(&camera, settings.damping);

        let mut scene = Self {
            graph,
            model,
            backdrop,
            camera,
            controls,
            animator: Animator::new(settings.smoothing),
            light: Light::default(),
            sky: Sky::default(),
            view: None,
        };
        scene.set_view(View::Fields);

        log::info!(
            "farm scene built: {} nodes, {} fields, {} crops, {} livestock, {} equipment",
            scene.graph.len(),
            scene.model.fields.len(),
            scene.model.crops.len(),
            scene.model.livestock.len(),
            scene.model.equipment.len()
        );
        Ok(scene)
    }

    pub fn set_view(&mut self, view: View) {
        self.model.apply_view(&mut self.graph, Some(view));
        self.view = Some(view);
        log::debug!("view set to {}", view);
    }

    /// Unknown names leave all four collections hidden.
    pub fn set_view_by_name(&mut self, name: &str) {
        self.view = self.model.apply_view_by_name(&mut self.graph, name);
    }

    pub fn current_view(&self) -> Option<View> {
        self.view
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.camera.set_viewport(width, height);
        log::debug!("viewport resized to {}x{}", width, height);
    }

    /// Advances every visible animated object by `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        self.animator.tick(&mut self.graph, &mut self.model, delta);
    }

    /// Eases the camera towards pending orbit and zoom input. Runs every
    /// frame, paused or not.
    pub fn update_controls(&mut self) {
        self.controls.update(&mut self.camera);
    }

    pub fn render(&self, frame: &mut FrameBuffer) {
        frame.clear(&self.sky);
        frame.draw_scene(&self.graph, &self.camera, &self.light);
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Direct node access, for placing objects by hand.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn model(&self) -> &FarmModel {
        &self.model
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }
}

/// Creates the four collections at their reference placements and attaches
/// them to the graph.
pub fn populate(graph: &mut SceneGraph, rng: &mut impl UniformSource) -> Result<FarmModel, SceneError> {
    let mut model = FarmModel::default();

    for i in 0..FIELD_COUNT {
        let field = factories::create_field(graph, factories::field_placement(i))?;
        graph.add_to_root(field);
        model.fields.push(field);
    }

    for i in 0..CROP_COUNT {
        let crop = factories::create_crop(graph, factories::crop_placement(i), rng)?;
        graph.add_to_root(crop.node);
        model.crops.push(crop);
    }

    for _ in 0..LIVESTOCK_COUNT {
        let at = Vec3::new(rng.range(-20.0, 20.0), 0.0, rng.range(-20.0, 20.0));
        let animal = factories::create_livestock(graph, at, rng)?;
        graph.add_to_root(animal.node);
        model.livestock.push(animal);
    }

    let tractor = factories::create_equipment(graph, Vec3::ZERO, PATROL_ROUTE.to_vec(), TRACTOR_SPEED)?;
    graph.add_to_root(tractor.node);
    model.equipment.push(tractor);

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use factories::FixedSequence;

    fn scene() -> FarmScene {
        let mut rng = FixedSequence::new(vec![0.2, 0.7, 0.4, 0.9, 0.1]);
        FarmScene::initialize(&SceneSettings::default(), 120, 40, &mut rng).unwrap()
    }

    #[test]
    fn test_reference_collection_sizes() {
        let scene = scene();
        let model = scene.model();
        assert_eq!(model.fields.len(), 4);
        assert_eq!(model.crops.len(), 16);
        assert_eq!(model.livestock.len(), 5);
        assert_eq!(model.equipment.len(), 1);
    }

    #[test]
    fn test_initial_view_is_fields() {
        let scene = scene();
        assert_eq!(scene.current_view(), Some(View::Fields));
        let model = scene.model();
        assert!(model.fields.iter().all(|id| scene.graph().is_visible(*id)));
        assert!(model.crop_nodes().all(|id| !scene.graph().is_visible(id)));
    }

    #[test]
    fn test_unknown_view_name_clears_view() {
        let mut scene = scene();
        scene.set_view_by_name("orchard");
        assert_eq!(scene.current_view(), None);
        assert!(scene.model().all_nodes().all(|id| !scene.graph().is_visible(id)));
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut scene = scene();
        scene.on_resize(200, 50);
        assert!((scene.camera().aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_render_draws_something() {
        let scene = scene();
        let mut frame = FrameBuffer::new(120, 40);
        scene.render(&mut frame);
        let drawn = (0..40)
            .flat_map(|y| frame.row(y).iter())
            .filter(|c| !c.is_empty())
            .count();
        assert!(drawn > 120 * 40 / 4);
    }
}
