//! Per-frame procedural animation.
//!
//! [`Animator::tick`] walks each collection once per frame. Objects whose
//! visibility flag is off are skipped entirely: their state is frozen and
//! their transform left untouched until they are shown again, so hidden
//! objects cost nothing and do not drift while out of view.

pub mod crops;
pub mod equipment;
pub mod livestock;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scene::graph::SceneGraph;
use crate::scene::model::FarmModel;

/// Livestock position blend applied per frame at the reference frame rate.
pub const LIVESTOCK_BLEND_PER_FRAME: f32 = 0.02;
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

/// How livestock positions chase their wander target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoothing {
    /// Fixed blend of 0.02 per tick. Speed depends on the frame rate.
    /// A zero-length tick does not blend.
    PerFrame,
    /// `1 - exp(-k * delta)`, with `k` matching 0.02 per tick at 60 Hz.
    #[default]
    TimeScaled,
}

impl Smoothing {
    /// Rate constant `k` of the time-scaled filter, per second.
    pub fn rate() -> f32 {
        -(1.0 - LIVESTOCK_BLEND_PER_FRAME).ln() * REFERENCE_FRAME_RATE
    }

    pub fn blend_factor(self, delta: f32) -> f32 {
        match self {
            Smoothing::PerFrame if delta > 0.0 => LIVESTOCK_BLEND_PER_FRAME,
            Smoothing::PerFrame => 0.0,
            Smoothing::TimeScaled => -(-Self::rate() * delta).exp_m1(),
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Smoothing::PerFrame => "per_frame",
            Smoothing::TimeScaled => "time_scaled",
        })
    }
}

impl FromStr for Smoothing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_frame" => Ok(Smoothing::PerFrame),
            "time_scaled" => Ok(Smoothing::TimeScaled),
            other => Err(format!(
                "Unknown smoothing '{}'. Expected per_frame or time_scaled",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Animator {
    pub smoothing: Smoothing,
}

impl Animator {
    pub fn new(smoothing: Smoothing) -> Self {
        Self { smoothing }
    }

    pub fn tick(&self, graph: &mut SceneGraph, model: &mut FarmModel, delta: f32) {
        for crop in &mut model.crops {
            if !graph.is_visible(crop.node) {
                continue; // frozen while hidden
            }
            crops::sway(&mut crop.state, graph.node_mut(crop.node), delta);
        }

        let blend = self.smoothing.blend_factor(delta);
        for animal in &mut model.livestock {
            if !graph.is_visible(animal.node) {
                continue; // frozen while hidden
            }
            livestock::wander(&mut animal.state, graph.node_mut(animal.node), delta, blend);
        }

        for vehicle in &mut model.equipment {
            if !graph.is_visible(vehicle.node) {
                continue; // frozen while hidden
            }
            equipment::patrol(&mut vehicle.state, graph, vehicle.node, delta);
        }
    }
}
