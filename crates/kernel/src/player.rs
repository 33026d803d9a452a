use blockcraft_common::Aabb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;

/// Vertical motion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Airborne,
    Grounded,
}

/// Player kinematic state. Mutated only by `World::step`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Player {
    /// Feet position: bottom center of the body box.
    pub feet: Vec3,
    pub velocity_y: f32,
    pub state: MotionState,
}

impl Player {
    pub fn at(feet: Vec3) -> Self {
        Self {
            feet,
            velocity_y: 0.0,
            state: MotionState::Airborne,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.state == MotionState::Grounded
    }

    pub fn eye(&self, config: &PlayerConfig) -> Vec3 {
        self.feet + Vec3::Y * config.eye_height
    }

    pub fn aabb(&self, config: &PlayerConfig) -> Aabb {
        body_at(self.feet, config)
    }
}

/// Body box for feet at `feet`: `2r x h x 2r`, centered half a body above the feet.
pub(crate) fn body_at(feet: Vec3, config: &PlayerConfig) -> Aabb {
    let center = feet + Vec3::Y * (config.height * 0.5);
    let size = Vec3::new(config.radius * 2.0, config.height, config.radius * 2.0);
    Aabb::from_center_size(center, size)
}
