//! Scene object registry and the per-entity animation state records.

use glam::Vec3;

use super::graph::NodeId;
use crate::error::SceneError;

#[derive(Debug, Clone, PartialEq)]
pub struct CropState {
    pub(crate) phase: f32,
    initial_y: f32,
}

impl CropState {
    pub fn new(phase: f32, initial_y: f32) -> Self {
        Self { phase, initial_y }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn initial_y(&self) -> f32 {
        self.initial_y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LivestockState {
    initial_position: Vec3,
    pub(crate) movement_phase: f32,
    speed: f32,
}

impl LivestockState {
    pub fn new(initial_position: Vec3, movement_phase: f32, speed: f32) -> Result<Self, SceneError> {
        if speed.is_nan() || speed <= 0.0 {
            return Err(SceneError::NonPositiveSpeed {
                entity: "livestock",
                speed,
            });
        }
        Ok(Self {
            initial_position,
            movement_phase,
            speed,
        })
    }

    /// Anchor the animal wanders around.
    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    pub fn movement_phase(&self) -> f32 {
        self.movement_phase
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentState {
    route: Vec<Vec3>,
    pub(crate) route_index: usize,
    speed: f32,
    wheels: Vec<NodeId>,
}

impl EquipmentState {
    pub fn new(route: Vec<Vec3>, speed: f32, wheels: Vec<NodeId>) -> Result<Self, SceneError> {
        if route.is_empty() {
            return Err(SceneError::EmptyRoute);
        }
        if speed.is_nan() || speed <= 0.0 {
            return Err(SceneError::NonPositiveSpeed {
                entity: "equipment",
                speed,
            });
        }
        Ok(Self {
            route,
            route_index: 0,
            speed,
            wheels,
        })
    }

    pub fn route(&self) -> &[Vec3] {
        &self.route
    }

    pub fn route_index(&self) -> usize {
        self.route_index
    }

    pub fn current_target(&self) -> Vec3 {
        self.route[self.route_index]
    }

    pub(crate) fn advance(&mut self) -> Vec3 {
        self.route_index = (self.route_index + 1) % self.route.len();
        self.current_target()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn wheels(&self) -> &[NodeId] {
        &self.wheels
    }

    pub(crate) fn attach_wheels(&mut self, wheels: Vec<NodeId>) {
        self.wheels = wheels;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    pub node: NodeId,
    pub state: CropState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Livestock {
    pub node: NodeId,
    pub state: LivestockState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Equipment {
    pub node: NodeId,
    pub state: EquipmentState,
}

/// The four toggled collections. Filled once at scene construction, never
/// resized or reordered afterwards.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FarmModel {
    pub fields: Vec<NodeId>,
    pub crops: Vec<Crop>,
    pub livestock: Vec<Livestock>,
    pub equipment: Vec<Equipment>,
}

impl FarmModel {
    pub fn crop_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.crops.iter().map(|c| c.node)
    }

    pub fn livestock_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.livestock.iter().map(|l| l.node)
    }

    pub fn equipment_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.equipment.iter().map(|e| e.node)
    }

    /// Every handle across all four collections, in collection order.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.fields
            .iter()
            .copied()
            .chain(self.crop_nodes())
            .chain(self.livestock_nodes())
            .chain(self.equipment_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_livestock_rejects_non_positive_speed() {
        let err = LivestockState::new(Vec3::ZERO, 0.0, 0.0).unwrap_err();
        assert_eq!(err.kind(), "NonPositiveSpeed");
        assert!(LivestockState::new(Vec3::ZERO, 0.0, f32::NAN).is_err());
        assert!(LivestockState::new(Vec3::ZERO, 0.0, -1.0).is_err());
    }

    #[test]
    fn test_equipment_rejects_empty_route() {
        let err = EquipmentState::new(Vec::new(), 1.0, Vec::new()).unwrap_err();
        assert_eq!(err, SceneError::EmptyRoute);
    }

    #[test]
    fn test_equipment_advance_wraps() {
        let route = vec![Vec3::X, Vec3::Y, Vec3::Z];
        let mut state = EquipmentState::new(route, 1.0, Vec::new()).unwrap();
        assert_eq!(state.route_index(), 0);
        assert_eq!(state.advance(), Vec3::Y);
        assert_eq!(state.advance(), Vec3::Z);
        assert_eq!(state.advance(), Vec3::X);
        assert_eq!(state.route_index(), 0);
    }

    #[test]
    fn test_single_waypoint_route_stays_put() {
        let mut state = EquipmentState::new(vec![Vec3::ONE], 1.0, Vec::new()).unwrap();
        state.advance();
        assert_eq!(state.route_index(), 0);
    }
}
